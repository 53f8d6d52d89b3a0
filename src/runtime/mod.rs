pub mod lifetime;
pub mod reconcile;

pub use reconcile::{ReconcileReport, delete_expired, spawn_expired_cleanup};
