//! Core library for the Toolspan agent tool framework.
//!
//! This crate provides the infrastructure for registering and invoking agent
//! tools, centered on schema-driven HTTP request synthesis: an OpenAPI
//! operation descriptor plus a flat argument map becomes an outbound HTTP
//! request, and the response becomes a single text result for the agent.
//!
//! # Architecture Overview
//!
//! - **Tool system**: an async [`tools::Tool`] trait and an injectable
//!   [`tools::ToolRegistry`] lookup
//! - **OpenAPI tools**: parameter routing, best-effort type coercion,
//!   content-type-driven body serialization, and response normalization,
//!   behind a swappable HTTP transport
//! - **Text splitting**: separator-based chunking as a tool
//! - **Configuration**: YAML tool definitions validated at load time

pub mod config;
pub mod errors;
pub mod tools;

pub use config::{ConfigLoader, ToolConfig};
pub use errors::{AgentError, InvocationError};
pub use tools::openapi::{OpenApiTool, ReqwestTransport};
pub use tools::{Tool, ToolMetadata, ToolRegistry};
