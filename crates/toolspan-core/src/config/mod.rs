//! Tool definition loading and validation

pub mod loader;
pub mod types;

pub use loader::{build_tool, register_from_file, ConfigLoader};
pub use types::{SplitterConfig, ToolConfig, ToolType};
