//! Loading tool definitions and turning them into registered tools

use std::path::Path;
use std::sync::Arc;
use tokio::fs;

use crate::config::types::{ToolConfig, ToolType};
use crate::errors::AgentError;
use crate::tools::openapi::HttpTransport;
use crate::tools::{CharacterSplitterTool, OpenApiTool, Tool, ToolRegistry};

/// Loader for YAML tool definition files.
pub struct ConfigLoader;

impl ConfigLoader {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<ToolConfig, AgentError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await.map_err(|e| {
            AgentError::ConfigError(format!(
                "Failed to read tool definition {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_str(&content)
    }

    pub fn from_str(content: &str) -> Result<ToolConfig, AgentError> {
        let config: ToolConfig = serde_yaml::from_str(content).map_err(|e| {
            AgentError::ConfigError(format!("Failed to parse tool definition: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }
}

/// Instantiate the tool a definition describes.
pub fn build_tool(
    config: &ToolConfig,
    transport: Arc<dyn HttpTransport>,
) -> Result<Arc<dyn Tool>, AgentError> {
    match config.tool_type {
        ToolType::Api => {
            let operation = config.openapi.clone().ok_or_else(|| {
                AgentError::ConfigError(format!("Tool '{}' has no 'openapi' section", config.name))
            })?;
            let mut headers: Vec<(String, String)> = config
                .headers
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect();
            headers.sort();
            Ok(Arc::new(
                OpenApiTool::new(
                    config.name.clone(),
                    config.description.clone(),
                    operation,
                    transport,
                )
                .with_headers(headers),
            ))
        }
        ToolType::Splitter => {
            let settings = config.splitter.clone().unwrap_or_default();
            Ok(Arc::new(
                CharacterSplitterTool::new(
                    settings.separator,
                    settings.chunk_size,
                    settings.chunk_overlap,
                )
                .named(config.name.clone()),
            ))
        }
    }
}

/// Load a tool definition file and register the resulting tool.
pub async fn register_from_file<P: AsRef<Path>>(
    registry: &mut ToolRegistry,
    path: P,
    transport: Arc<dyn HttpTransport>,
) -> Result<Arc<dyn Tool>, AgentError> {
    let config = ConfigLoader::from_file(path).await?;
    let tool = build_tool(&config, transport)?;
    registry.register_tool(tool.clone());
    log::info!("Registered tool '{}'", config.name);
    Ok(tool)
}
