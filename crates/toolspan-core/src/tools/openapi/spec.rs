//! Operation descriptor types for OpenAPI-backed tools
//!
//! An [`Operation`] is the static, schema-driven description of one HTTP
//! operation: a URL template, a method, parameter declarations, and an
//! optional request body schema. Descriptors are deserialized once at tool
//! registration (from the OpenAPI subset embedded in a tool definition file)
//! and are read-only afterwards, so a single descriptor can be shared across
//! concurrent invocations.
//!
//! Parsing is the strict edge of the pipeline: an unrecognized schema `type`
//! or a schema with neither `type` nor `anyOf` is rejected here, while the
//! invocation path stays lenient (see the coercion module).

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::errors::InvocationError;

/// Static description of one HTTP operation.
///
/// The wire format nests parameter declarations under an `operation` key
/// (`operation.parameters`); the in-memory model is flat.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawOperation")]
pub struct Operation {
    /// URL template with `{name}` placeholders for path parameters.
    pub url: String,
    /// HTTP verb, matched case-insensitively at request-build time.
    pub method: String,
    pub parameters: Vec<ParameterSpec>,
    pub request_body: Option<RequestBody>,
}

#[derive(Deserialize)]
struct RawOperation {
    url: String,
    method: String,
    #[serde(default)]
    operation: RawParameters,
    #[serde(rename = "requestBody", default)]
    request_body: Option<RequestBody>,
}

#[derive(Deserialize, Default)]
struct RawParameters {
    #[serde(default)]
    parameters: Vec<ParameterSpec>,
}

impl From<RawOperation> for Operation {
    fn from(raw: RawOperation) -> Self {
        Operation {
            url: raw.url,
            method: raw.method,
            parameters: raw.operation.parameters,
            request_body: raw.request_body,
        }
    }
}

/// Declaration of one path/query/header/cookie parameter.
#[derive(Debug, Clone, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub schema: Option<TypeSpec>,
}

/// Where a parameter is routed on the wire.
///
/// Locations outside the four known slots deserialize to `Unknown` and are
/// left unrouted by the parameter router rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
    Unknown,
}

impl<'de> Deserialize<'de> for ParameterLocation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        Ok(match tag.as_str() {
            "path" => ParameterLocation::Path,
            "query" => ParameterLocation::Query,
            "header" => ParameterLocation::Header,
            "cookie" => ParameterLocation::Cookie,
            _ => ParameterLocation::Unknown,
        })
    }
}

/// Request body declaration: content type mapped to its schema.
///
/// Declaration order of the content map is preserved; only the first entry
/// is ever used to synthesize a body.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawRequestBody")]
pub struct RequestBody {
    pub content: Vec<(String, BodySchema)>,
}

#[derive(Deserialize)]
struct RawRequestBody {
    #[serde(default)]
    content: Map<String, Value>,
}

impl TryFrom<RawRequestBody> for RequestBody {
    type Error = String;

    fn try_from(raw: RawRequestBody) -> Result<Self, Self::Error> {
        let content = raw
            .content
            .into_iter()
            .map(|(content_type, media)| {
                let schema = match media.get("schema") {
                    Some(schema) => serde_json::from_value::<BodySchema>(schema.clone())
                        .map_err(|e| format!("invalid body schema for '{content_type}': {e}"))?,
                    None => BodySchema::default(),
                };
                Ok((content_type, schema))
            })
            .collect::<Result<Vec<_>, String>>()?;
        Ok(RequestBody { content })
    }
}

impl RequestBody {
    /// First declared content type and its body schema, if any.
    pub fn first_content(&self) -> Option<(&str, &BodySchema)> {
        self.content
            .first()
            .map(|(content_type, schema)| (content_type.as_str(), schema))
    }
}

/// JSON-Schema-like object schema for a request body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "RawBodySchema")]
pub struct BodySchema {
    /// Names of properties that must be present in the invocation input.
    pub required: Vec<String>,
    /// Properties in declaration order.
    pub properties: Vec<(String, TypeSpec)>,
}

#[derive(Deserialize)]
struct RawBodySchema {
    #[serde(default)]
    required: Vec<String>,
    #[serde(default)]
    properties: Map<String, Value>,
}

impl TryFrom<RawBodySchema> for BodySchema {
    type Error = String;

    fn try_from(raw: RawBodySchema) -> Result<Self, Self::Error> {
        let properties = raw
            .properties
            .into_iter()
            .map(|(name, schema)| match serde_json::from_value::<TypeSpec>(schema) {
                Ok(spec) => Ok((name, spec)),
                Err(e) => Err(format!("invalid schema for property '{name}': {e}")),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(BodySchema {
            required: raw.required,
            properties,
        })
    }
}

/// JSON-Schema-like type declaration, possibly a union of alternatives.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawTypeSpec")]
pub struct TypeSpec {
    pub kind: TypeKind,
    pub default: Option<Value>,
}

/// The shape a value is coerced towards.
///
/// A closed sum type instead of an open string tag: every supported `type`
/// is a variant and the coercer matches exhaustively, so an unsupported type
/// cannot slip past descriptor parsing.
#[derive(Debug, Clone)]
pub enum TypeKind {
    Integer,
    Number,
    String,
    Boolean,
    Null,
    Object,
    AnyOf(Vec<TypeSpec>),
}

#[derive(Deserialize)]
struct RawTypeSpec {
    #[serde(rename = "type")]
    ty: Option<String>,
    #[serde(rename = "anyOf")]
    any_of: Option<Vec<TypeSpec>>,
    #[serde(default)]
    default: Option<Value>,
}

impl TryFrom<RawTypeSpec> for TypeSpec {
    type Error = String;

    fn try_from(raw: RawTypeSpec) -> Result<Self, Self::Error> {
        // `type` wins when both are declared.
        let kind = if let Some(ty) = raw.ty {
            match ty.as_str() {
                "integer" | "int" => TypeKind::Integer,
                "number" => TypeKind::Number,
                "string" => TypeKind::String,
                "boolean" => TypeKind::Boolean,
                "null" => TypeKind::Null,
                "object" => TypeKind::Object,
                other => return Err(format!("unsupported schema type '{other}'")),
            }
        } else if let Some(options) = raw.any_of {
            TypeKind::AnyOf(options)
        } else {
            return Err("schema declares neither 'type' nor 'anyOf'".to_string());
        };
        Ok(TypeSpec {
            kind,
            default: raw.default,
        })
    }
}

/// HTTP verbs the request executor is willing to dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    /// Case-insensitive parse; anything outside the allowed verb set is
    /// rejected before dispatch.
    pub fn parse(method: &str) -> Result<Self, InvocationError> {
        match method.to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "head" => Ok(HttpMethod::Head),
            "post" => Ok(HttpMethod::Post),
            "put" => Ok(HttpMethod::Put),
            "delete" => Ok(HttpMethod::Delete),
            "patch" => Ok(HttpMethod::Patch),
            _ => Err(InvocationError::UnsupportedMethod(method.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_operation_from_yaml() {
        let yaml = r#"
url: "https://api.example.com/users/{id}"
method: GET
operation:
  parameters:
    - name: id
      in: path
      required: true
      schema:
        type: integer
    - name: verbose
      in: query
      schema:
        type: boolean
        default: false
"#;
        let op: Operation = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(op.url, "https://api.example.com/users/{id}");
        assert_eq!(op.parameters.len(), 2);
        assert_eq!(op.parameters[0].location, ParameterLocation::Path);
        assert!(op.parameters[0].required);
        assert!(!op.parameters[1].required);
        let default = op.parameters[1].schema.as_ref().unwrap().default.clone();
        assert_eq!(default, Some(Value::Bool(false)));
    }

    #[test]
    fn test_int_is_an_alias_for_integer() {
        let spec: TypeSpec = serde_json::from_value(serde_json::json!({"type": "int"})).unwrap();
        assert!(matches!(spec.kind, TypeKind::Integer));
    }

    #[test]
    fn test_unknown_location_is_preserved_as_unknown() {
        let yaml = r#"
name: weird
in: matrix
"#;
        let param: ParameterSpec = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(param.location, ParameterLocation::Unknown);
    }

    #[test]
    fn test_unsupported_type_is_rejected() {
        let result: Result<TypeSpec, _> =
            serde_json::from_value(serde_json::json!({"type": "array"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_schema_without_type_or_any_of_is_rejected() {
        let result: Result<TypeSpec, _> = serde_json::from_value(serde_json::json!({"default": 3}));
        assert!(result.is_err());
    }

    #[test]
    fn test_nested_any_of_parses() {
        let spec: TypeSpec = serde_json::from_value(serde_json::json!({
            "anyOf": [
                {"type": "integer"},
                {"anyOf": [{"type": "boolean"}, {"type": "null"}]}
            ]
        }))
        .unwrap();
        match spec.kind {
            TypeKind::AnyOf(options) => {
                assert_eq!(options.len(), 2);
                assert!(matches!(options[1].kind, TypeKind::AnyOf(_)));
            }
            other => panic!("expected anyOf, got {other:?}"),
        }
    }

    #[test]
    fn test_body_schema_keeps_property_order() {
        let schema: BodySchema = serde_json::from_value(serde_json::json!({
            "required": ["a"],
            "properties": {
                "a": {"type": "integer"},
                "b": {"type": "string"},
                "c": {"type": "boolean"}
            }
        }))
        .unwrap();
        let names: Vec<&str> = schema.properties.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_invalid_property_schema_error_names_the_property() {
        let result: Result<BodySchema, _> = serde_json::from_value(serde_json::json!({
            "properties": {
                "good": {"type": "string"},
                "bad": {"type": "array"}
            }
        }));
        let message = result.unwrap_err().to_string();
        assert!(message.contains("bad"));
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!(HttpMethod::parse("GET").unwrap(), HttpMethod::Get);
        assert_eq!(HttpMethod::parse("Patch").unwrap(), HttpMethod::Patch);
        assert!(matches!(
            HttpMethod::parse("options"),
            Err(InvocationError::UnsupportedMethod(_))
        ));
    }
}
