//! 终端导航外壳

pub mod commands;
pub mod navigation;
pub mod render;
pub mod routes;
pub mod screen;

pub use commands::Command;
pub use navigation::{Flow, NavigationShell, Navbar};
pub use routes::{Route, guard};
pub use screen::ListScreen;
