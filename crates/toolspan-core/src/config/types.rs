//! Tool definition types loaded from YAML
//!
//! A tool definition file names a tool, picks its kind, and carries the
//! kind-specific section: an OpenAPI operation descriptor for `api` tools,
//! chunking settings for `splitter` tools. Validation happens at load time
//! so a bad definition never reaches the registry.

use serde::Deserialize;
use std::collections::HashMap;

use crate::errors::AgentError;
use crate::tools::openapi::Operation;

#[derive(Debug, Clone, Deserialize)]
pub struct ToolConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub tool_type: ToolType,
    #[serde(default)]
    pub openapi: Option<Operation>,
    #[serde(default)]
    pub splitter: Option<SplitterConfig>,
    /// Static headers sent on every invocation of an `api` tool.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolType {
    Api,
    Splitter,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SplitterConfig {
    #[serde(default = "default_separator")]
    pub separator: String,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

fn default_separator() -> String {
    "\n\n".to_string()
}

fn default_chunk_size() -> usize {
    200
}

fn default_chunk_overlap() -> usize {
    20
}

impl ToolConfig {
    pub fn validate(&self) -> Result<(), AgentError> {
        if self.name.trim().is_empty() {
            return Err(AgentError::ValidationError(
                "Tool name cannot be empty".to_string(),
            ));
        }
        if self.tool_type == ToolType::Api && self.openapi.is_none() {
            return Err(AgentError::ValidationError(format!(
                "Tool '{}' is of type 'api' but has no 'openapi' section",
                self.name
            )));
        }
        Ok(())
    }
}
