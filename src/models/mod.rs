pub mod auth;
pub mod chat;
pub mod classes;
pub mod common;
pub mod files;
pub mod notifications;
pub mod officers;
pub mod reports;
pub mod students;
pub mod tasks;

pub use common::ErrorBody;
