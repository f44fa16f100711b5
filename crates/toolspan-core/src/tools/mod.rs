//! Tool system for extending agent capabilities with external functionality
//!
//! Tools are registered dynamically and invoked by name with a flat JSON
//! argument object, decoupling agent logic from specific tool
//! implementations. The registry is an explicit, injectable lookup
//! (`get_tool(name) -> Option<_>`) rather than a global singleton, which
//! keeps tests and concurrent callers honest about their dependencies.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::AgentError;

/// Description of a tool as published to an agent.
#[derive(Debug, Clone)]
pub struct ToolMetadata {
    pub name: String,
    pub description: String,
    /// JSON-Schema object describing the expected arguments.
    pub input_schema: Value,
}

/// Core trait that all tools implement.
#[async_trait]
pub trait Tool: Send + Sync {
    fn metadata(&self) -> ToolMetadata;
    async fn execute(&self, arguments: Value) -> Result<String, AgentError>;
}

/// Registry for managing multiple tools.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register_tool(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.metadata().name.clone();
        self.tools.insert(name, tool);
    }

    pub fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn list_tools(&self) -> Vec<ToolMetadata> {
        self.tools.values().map(|tool| tool.metadata()).collect()
    }

    pub fn remove_tool(&mut self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.remove(name)
    }

    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub mod openapi;
pub mod splitter;

pub use openapi::OpenApiTool;
pub use splitter::CharacterSplitterTool;
