pub mod form;
pub mod list;
pub mod permission;
pub mod resource;

pub use form::{FormController, FormDraft, FormMode, FormState};
pub use list::{ActionOutcome, Banner, ListView, ResourceListController};
pub use permission::{PERMISSION_DENIED, PermissionGate};
pub use resource::{FieldKind, FieldOption, FieldSpec, Resource};
