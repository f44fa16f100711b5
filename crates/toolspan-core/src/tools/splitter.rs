//! Separator-based text chunking exposed as a tool
//!
//! A thin wrapper, kept deliberately simple: split on a configured
//! separator, merge pieces into chunks no larger than `chunk_size`, and
//! carry `chunk_overlap` trailing characters into the next chunk.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::errors::AgentError;
use crate::tools::{Tool, ToolMetadata};

pub struct CharacterSplitterTool {
    name: String,
    separator: String,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl CharacterSplitterTool {
    pub fn new(separator: impl Into<String>, chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            name: "character_splitter".to_string(),
            separator: separator.into(),
            chunk_size,
            chunk_overlap,
        }
    }

    /// Registration name, when the tool definition names the instance.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        if text.len() <= self.chunk_size {
            return vec![text.to_string()];
        }

        let mut chunks = Vec::new();
        let mut current = String::new();
        for piece in text.split(&self.separator) {
            let candidate_len = if current.is_empty() {
                piece.len()
            } else {
                current.len() + self.separator.len() + piece.len()
            };
            if candidate_len > self.chunk_size && !current.is_empty() {
                chunks.push(current.clone());
                if self.chunk_overlap > 0 && current.len() > self.chunk_overlap {
                    let mut start = current.len() - self.chunk_overlap;
                    // Keep the overlap cut on a character boundary.
                    while start > 0 && !current.is_char_boundary(start) {
                        start -= 1;
                    }
                    current = current[start..].to_string();
                } else {
                    current.clear();
                }
            }
            if current.is_empty() {
                current = piece.to_string();
            } else {
                current.push_str(&self.separator);
                current.push_str(piece);
            }
        }
        if !current.is_empty() {
            chunks.push(current);
        }
        chunks
    }
}

impl Default for CharacterSplitterTool {
    fn default() -> Self {
        Self::new("\n\n", 200, 20)
    }
}

#[async_trait]
impl Tool for CharacterSplitterTool {
    fn metadata(&self) -> ToolMetadata {
        ToolMetadata {
            name: self.name.clone(),
            description: "Splits text into overlapping chunks on a separator".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "text": {
                        "type": "string",
                        "description": "The text to split into chunks"
                    }
                },
                "required": ["text"]
            }),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<String, AgentError> {
        let text = arguments
            .get("text")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AgentError::ToolError {
                tool_name: self.name.clone(),
                message: "Missing or invalid 'text' parameter".to_string(),
            })?;

        let chunks = self.split_text(text);
        serde_json::to_string(&chunks).map_err(|e| AgentError::ToolError {
            tool_name: self.name.clone(),
            message: format!("Failed to encode chunks: {}", e),
        })
    }
}
