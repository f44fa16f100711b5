//! Error types for failure handling across the tool framework
//!
//! This module provides a unified error hierarchy covering tool registration,
//! configuration loading, and tool execution. Errors are categorized by their
//! source so callers can distinguish configuration mistakes (fix the YAML)
//! from invocation failures (fix the arguments) from transport failures
//! (check the network).

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum AgentError {
    #[error("Tool execution failed for '{tool_name}': {message}")]
    ToolError { tool_name: String, message: String },
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Failure modes of a single OpenAPI tool invocation.
///
/// Structural problems (missing required input, a method outside the allowed
/// verb set, a blown recursion budget) abort the invocation. Everything else
/// in request synthesis is best-effort by design: coercion mismatches and
/// unknown parameter locations degrade gracefully and never surface here.
#[derive(Error, Debug, Clone)]
pub enum InvocationError {
    #[error("Missing required parameter '{0}'")]
    MissingParameter(String),
    #[error("anyOf nesting exceeded the recursion budget")]
    RecursionLimit,
    #[error("Unsupported HTTP method '{0}'")]
    UnsupportedMethod(String),
    #[error("Request failed with status code {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for InvocationError {
    fn from(err: reqwest::Error) -> Self {
        InvocationError::Transport(err.to_string())
    }
}
