//! Routing of declared parameters into their wire destinations

use serde_json::{Map, Value};

use super::spec::{ParameterLocation, ParameterSpec};
use crate::errors::InvocationError;

/// Destination maps for routed parameters.
///
/// Headers are collected in declaration order without deduplication; merge
/// precedence against caller-supplied headers belongs to the caller. The
/// cookie map is populated for completeness but lies outside the transport
/// contract, so routed cookies are never transmitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutedParameters {
    pub path: Map<String, Value>,
    pub query: Map<String, Value>,
    pub header: Map<String, Value>,
    pub cookie: Map<String, Value>,
}

/// Classify each declared parameter by its location and populate the
/// destination maps.
///
/// Value resolution per parameter: the invocation input wins; a missing
/// required parameter is a hard error; otherwise the schema default applies
/// when present. A resolved explicit null is still routed; only truly
/// absent values are skipped. Unknown locations are dropped silently.
pub fn route_parameters(
    parameters: &[ParameterSpec],
    input: &Map<String, Value>,
) -> Result<RoutedParameters, InvocationError> {
    let mut routed = RoutedParameters::default();
    for parameter in parameters {
        let Some(value) = resolve_value(parameter, input)? else {
            continue;
        };
        match parameter.location {
            ParameterLocation::Path => {
                routed.path.insert(parameter.name.clone(), value);
            }
            ParameterLocation::Query => {
                routed.query.insert(parameter.name.clone(), value);
            }
            ParameterLocation::Header => {
                routed.header.insert(parameter.name.clone(), value);
            }
            ParameterLocation::Cookie => {
                routed.cookie.insert(parameter.name.clone(), value);
            }
            ParameterLocation::Unknown => {
                log::debug!(
                    "Dropping parameter '{}' with unrecognized location",
                    parameter.name
                );
            }
        }
    }
    Ok(routed)
}

fn resolve_value(
    parameter: &ParameterSpec,
    input: &Map<String, Value>,
) -> Result<Option<Value>, InvocationError> {
    if let Some(value) = input.get(&parameter.name) {
        return Ok(Some(value.clone()));
    }
    if parameter.required {
        return Err(InvocationError::MissingParameter(parameter.name.clone()));
    }
    Ok(parameter
        .schema
        .as_ref()
        .and_then(|schema| schema.default.clone()))
}
