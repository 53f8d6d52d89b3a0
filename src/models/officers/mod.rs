pub mod entities;
pub mod requests;

pub use entities::OfficerAssignment;
pub use requests::OfficerPayload;
