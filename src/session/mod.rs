pub mod storage;
pub mod store;

pub use storage::{FileStorage, LocalStorage, MemoryStorage};
pub use store::SessionStore;
