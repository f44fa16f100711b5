//! Outbound body synthesis from a body schema and invocation input
//!
//! Only the first declared content-type entry of a request body is used; the
//! descriptor's declaration order is preserved end to end, so which entry is
//! "first" is exactly what the tool definition wrote.

use serde_json::{Map, Value};

use super::coerce::{self, plain_string};
use super::spec::RequestBody;
use crate::errors::InvocationError;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// Body fields assembled for one invocation, prior to serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedBody {
    /// Content type of the first declared entry; also becomes the outbound
    /// `Content-Type` header.
    pub content_type: String,
    /// Declared properties in declaration order. Optional properties absent
    /// from the input and without a default are present with a null value,
    /// not omitted.
    pub fields: Map<String, Value>,
}

/// Wire form of the outbound body.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPayload {
    Empty,
    /// Serialized text for the two recognized content types.
    Text(String),
    /// Unrecognized content type: the raw field map is handed to the
    /// transport unserialized.
    Fields(Map<String, Value>),
}

/// Build the field map for the first declared content type.
pub fn synthesize_body(
    request_body: Option<&RequestBody>,
    input: &Map<String, Value>,
) -> Result<Option<SynthesizedBody>, InvocationError> {
    let Some((content_type, schema)) = request_body.and_then(|body| body.first_content()) else {
        return Ok(None);
    };

    let mut fields = Map::new();
    for (name, spec) in &schema.properties {
        if let Some(value) = input.get(name) {
            let outcome = coerce::coerce(spec, value.clone())?;
            if !outcome.was_coerced() {
                log::debug!("Body field '{}' sent without coercion", name);
            }
            fields.insert(name.clone(), outcome.into_value());
        } else if schema.required.iter().any(|r| r == name) {
            return Err(InvocationError::MissingParameter(name.clone()));
        } else if let Some(default) = &spec.default {
            fields.insert(name.clone(), default.clone());
        } else {
            fields.insert(name.clone(), Value::Null);
        }
    }

    Ok(Some(SynthesizedBody {
        content_type: content_type.to_string(),
        fields,
    }))
}

impl SynthesizedBody {
    /// Serialize per the final content type: JSON and form encoding are the
    /// two recognized cases, anything else passes the field map through.
    pub fn into_payload(self) -> RequestPayload {
        match self.content_type.as_str() {
            CONTENT_TYPE_JSON => RequestPayload::Text(
                serde_json::to_string(&Value::Object(self.fields)).unwrap_or_default(),
            ),
            CONTENT_TYPE_FORM => RequestPayload::Text(form_encode(&self.fields)),
            _ => RequestPayload::Fields(self.fields),
        }
    }
}

fn form_encode(fields: &Map<String, Value>) -> String {
    fields
        .iter()
        .map(|(name, value)| {
            format!(
                "{}={}",
                urlencoding::encode(name),
                urlencoding::encode(&plain_string(value))
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(schema: Value) -> RequestBody {
        serde_json::from_value(schema).unwrap()
    }

    fn input(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_no_request_body_means_no_payload() {
        assert_eq!(synthesize_body(None, &Map::new()).unwrap(), None);
    }

    #[test]
    fn test_json_serialization() {
        let body = body(json!({
            "content": {
                "application/json": {
                    "schema": {"properties": {"a": {"type": "integer"}}}
                }
            }
        }));
        let synthesized = synthesize_body(Some(&body), &input(json!({"a": "1"})))
            .unwrap()
            .unwrap();
        assert_eq!(synthesized.content_type, CONTENT_TYPE_JSON);
        assert_eq!(
            synthesized.into_payload(),
            RequestPayload::Text("{\"a\":1}".to_string())
        );
    }

    #[test]
    fn test_form_serialization_keeps_declaration_order() {
        let body = body(json!({
            "content": {
                "application/x-www-form-urlencoded": {
                    "schema": {
                        "properties": {
                            "a": {"type": "integer"},
                            "b": {"type": "string"}
                        }
                    }
                }
            }
        }));
        let synthesized = synthesize_body(Some(&body), &input(json!({"b": "x", "a": 1})))
            .unwrap()
            .unwrap();
        assert_eq!(
            synthesized.into_payload(),
            RequestPayload::Text("a=1&b=x".to_string())
        );
    }

    #[test]
    fn test_unrecognized_content_type_passes_fields_through() {
        let body = body(json!({
            "content": {
                "text/plain": {
                    "schema": {"properties": {"a": {"type": "string"}}}
                }
            }
        }));
        let synthesized = synthesize_body(Some(&body), &input(json!({"a": "x"})))
            .unwrap()
            .unwrap();
        let mut expected = Map::new();
        expected.insert("a".to_string(), json!("x"));
        assert_eq!(synthesized.into_payload(), RequestPayload::Fields(expected));
    }

    #[test]
    fn test_only_the_first_content_type_is_used() {
        let body = body(json!({
            "content": {
                "application/x-www-form-urlencoded": {
                    "schema": {"properties": {"a": {"type": "string"}}}
                },
                "application/json": {
                    "schema": {"properties": {"b": {"type": "string"}}}
                }
            }
        }));
        let synthesized = synthesize_body(Some(&body), &input(json!({"a": "1", "b": "2"})))
            .unwrap()
            .unwrap();
        assert_eq!(synthesized.content_type, CONTENT_TYPE_FORM);
        assert!(synthesized.fields.contains_key("a"));
        assert!(!synthesized.fields.contains_key("b"));
    }

    #[test]
    fn test_missing_required_body_field_is_a_hard_error() {
        let body = body(json!({
            "content": {
                "application/json": {
                    "schema": {
                        "required": ["a"],
                        "properties": {"a": {"type": "integer"}}
                    }
                }
            }
        }));
        let err = synthesize_body(Some(&body), &Map::new()).unwrap_err();
        assert!(matches!(err, InvocationError::MissingParameter(name) if name == "a"));
    }

    #[test]
    fn test_optional_field_uses_default_then_null() {
        let body = body(json!({
            "content": {
                "application/json": {
                    "schema": {
                        "properties": {
                            "with_default": {"type": "integer", "default": 9},
                            "without": {"type": "string"}
                        }
                    }
                }
            }
        }));
        let synthesized = synthesize_body(Some(&body), &Map::new()).unwrap().unwrap();
        assert_eq!(synthesized.fields.get("with_default"), Some(&json!(9)));
        // Absent optional fields are present with an explicit null.
        assert_eq!(synthesized.fields.get("without"), Some(&Value::Null));
    }
}
