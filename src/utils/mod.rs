pub mod file_magic;
pub mod role;
pub mod serde_ext;
pub mod validate;

pub use file_magic::{inspect_attachment, validate_magic_bytes};
pub use role::{is_privileged_role, normalize_role};
pub use validate::{DATE_FORMAT, parse_date, validate_date_order, validate_email};
