pub mod auth;
pub mod chat;
pub mod reports;

pub use auth::AuthService;
pub use chat::ChatService;
pub use reports::ReportService;
