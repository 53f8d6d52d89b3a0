pub mod entities;

pub use entities::{ClassMember, Student};
