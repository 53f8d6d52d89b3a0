pub mod entities;
pub mod requests;

pub use entities::Notification;
pub use requests::NotificationPayload;
