//! Schema-driven HTTP tools backed by OpenAPI operation descriptors
//!
//! An [`OpenApiTool`] wraps one operation descriptor and turns a flat
//! argument map into an outbound HTTP request: parameters are routed into
//! path/query/header/cookie slots, body fields are coerced per their
//! JSON-Schema hints (including `anyOf` unions), the body is serialized per
//! content type, and the response is normalized into a single text result.
//!
//! The pipeline is deliberately permissive at the value level (coercion is
//! best-effort and never blocks a request) and strict at the structure level
//! (missing required inputs, unsupported verbs, and runaway union nesting
//! abort the invocation).

pub mod body;
pub mod coerce;
pub mod request;
pub mod response;
pub mod router;
pub mod spec;
pub mod transport;

pub use body::{RequestPayload, SynthesizedBody};
pub use coerce::Coercion;
pub use request::{build_request, SynthesizedRequest};
pub use response::{normalize_response, EMPTY_RESPONSE_MESSAGE};
pub use router::RoutedParameters;
pub use spec::{HttpMethod, Operation, ParameterLocation, ParameterSpec, TypeKind, TypeSpec};
pub use transport::{HttpTransport, ReqwestTransport, TransportResponse};

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Arc;

use crate::errors::AgentError;
use crate::tools::{Tool, ToolMetadata};

/// A tool that invokes one HTTP operation described by an OpenAPI subset.
///
/// The descriptor is read-only after construction, and no state is retained
/// across invocations, so a single instance is safe to share across
/// concurrent callers as long as the transport is.
pub struct OpenApiTool {
    name: String,
    description: String,
    operation: Operation,
    /// Static headers (e.g. auth) merged ahead of routed header parameters.
    headers: Vec<(String, String)>,
    transport: Arc<dyn HttpTransport>,
}

impl OpenApiTool {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        operation: Operation,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            operation,
            headers: Vec::new(),
            transport,
        }
    }

    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = headers;
        self
    }

    /// Derive a JSON-Schema object for the tool's arguments from the
    /// operation's parameters and body properties.
    fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for parameter in &self.operation.parameters {
            properties.insert(
                parameter.name.clone(),
                schema_hint(parameter.schema.as_ref()),
            );
            if parameter.required {
                required.push(parameter.name.clone());
            }
        }
        if let Some((_, schema)) = self
            .operation
            .request_body
            .as_ref()
            .and_then(|body| body.first_content())
        {
            for (name, spec) in &schema.properties {
                properties.insert(name.clone(), schema_hint(Some(spec)));
            }
            required.extend(schema.required.iter().cloned());
        }
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    fn tool_error(&self, message: impl std::fmt::Display) -> AgentError {
        AgentError::ToolError {
            tool_name: self.name.clone(),
            message: message.to_string(),
        }
    }
}

fn schema_hint(spec: Option<&TypeSpec>) -> Value {
    match spec.map(|s| &s.kind) {
        Some(TypeKind::Integer) => json!({"type": "integer"}),
        Some(TypeKind::Number) => json!({"type": "number"}),
        Some(TypeKind::String) => json!({"type": "string"}),
        Some(TypeKind::Boolean) => json!({"type": "boolean"}),
        Some(TypeKind::Null) => json!({"type": "null"}),
        Some(TypeKind::Object) => json!({"type": "object"}),
        Some(TypeKind::AnyOf(_)) | None => json!({}),
    }
}

#[async_trait]
impl Tool for OpenApiTool {
    fn metadata(&self) -> ToolMetadata {
        ToolMetadata {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: self.input_schema(),
        }
    }

    async fn execute(&self, arguments: Value) -> Result<String, AgentError> {
        let input = arguments
            .as_object()
            .cloned()
            .ok_or_else(|| self.tool_error("arguments must be a JSON object"))?;

        let request =
            build_request(&self.operation, &self.headers, &input).map_err(|e| self.tool_error(e))?;
        log::info!(
            "Invoking '{}': {} {}",
            self.name,
            request.method.as_str(),
            request.url
        );

        let response = self
            .transport
            .dispatch(&request)
            .await
            .map_err(|e| self.tool_error(e))?;
        normalize_response(&response).map_err(|e| self.tool_error(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Transport double that records every dispatched request and replies
    /// with a canned response.
    struct MockTransport {
        status: u16,
        body: Vec<u8>,
        captured: Mutex<Vec<SynthesizedRequest>>,
    }

    impl MockTransport {
        fn replying(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                status,
                body: body.as_bytes().to_vec(),
                captured: Mutex::new(Vec::new()),
            })
        }

        fn last_request(&self) -> SynthesizedRequest {
            self.captured.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl HttpTransport for MockTransport {
        async fn dispatch(
            &self,
            request: &SynthesizedRequest,
        ) -> Result<TransportResponse, crate::errors::InvocationError> {
            self.captured.lock().unwrap().push(request.clone());
            Ok(TransportResponse {
                status: self.status,
                body: self.body.clone(),
            })
        }
    }

    fn sample_operation() -> Operation {
        serde_yaml::from_str(
            r#"
url: "https://api.example.com/users/{id}"
method: post
operation:
  parameters:
    - { name: id, in: path, required: true }
    - { name: verbose, in: query, schema: { type: boolean, default: false } }
requestBody:
  content:
    application/json:
      schema:
        required: [note]
        properties:
          note: { type: string }
          rating: { type: integer }
"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_end_to_end_invocation() {
        let transport = MockTransport::replying(200, "{\"ok\": true}");
        let tool = OpenApiTool::new(
            "update_user",
            "Update a user record",
            sample_operation(),
            transport.clone(),
        );

        let output = tool
            .execute(json!({"id": 7, "note": "hi", "rating": "5"}))
            .await
            .unwrap();
        assert_eq!(output, "{\"ok\":true}");

        let request = transport.last_request();
        assert_eq!(request.url, "https://api.example.com/users/7");
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(
            request.query,
            vec![("verbose".to_string(), "false".to_string())]
        );
        assert_eq!(
            request.payload,
            RequestPayload::Text("{\"note\":\"hi\",\"rating\":5}".to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_required_parameter_surfaces_as_tool_error() {
        let transport = MockTransport::replying(200, "{}");
        let tool = OpenApiTool::new("update_user", "", sample_operation(), transport);
        let err = tool.execute(json!({"note": "hi"})).await.unwrap_err();
        match err {
            AgentError::ToolError { tool_name, message } => {
                assert_eq!(tool_name, "update_user");
                assert!(message.contains("id"));
            }
            other => panic!("expected ToolError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_error_status_surfaces_as_tool_error() {
        let transport = MockTransport::replying(500, "boom");
        let tool = OpenApiTool::new("update_user", "", sample_operation(), transport);
        let err = tool
            .execute(json!({"id": 1, "note": "x"}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_non_object_arguments_are_rejected() {
        let transport = MockTransport::replying(200, "{}");
        let tool = OpenApiTool::new("update_user", "", sample_operation(), transport);
        assert!(tool.execute(json!("just a string")).await.is_err());
    }

    #[test]
    fn test_metadata_schema_covers_parameters_and_body() {
        let transport = MockTransport::replying(200, "{}");
        let tool = OpenApiTool::new(
            "update_user",
            "Update a user record",
            sample_operation(),
            transport,
        );
        let metadata = tool.metadata();
        assert_eq!(metadata.name, "update_user");
        let properties = metadata.input_schema["properties"].as_object().unwrap();
        assert!(properties.contains_key("id"));
        assert!(properties.contains_key("verbose"));
        assert!(properties.contains_key("note"));
        let required = metadata.input_schema["required"].as_array().unwrap();
        assert!(required.contains(&json!("id")));
        assert!(required.contains(&json!("note")));
    }
}
