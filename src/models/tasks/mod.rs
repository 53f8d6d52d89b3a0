pub mod entities;
pub mod requests;

pub use entities::{Task, TaskPriority};
pub use requests::TaskPayload;
