pub mod entities;

pub use entities::{ExportFile, ExportFormat, Statistics};
