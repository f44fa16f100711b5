//! Synthesis of one outbound HTTP request from a descriptor and input
//!
//! Request construction is pure: identical descriptor and input always
//! produce an identical [`SynthesizedRequest`], which the transport then
//! dispatches.

use serde_json::{Map, Value};

use super::body::{self, RequestPayload};
use super::coerce::plain_string;
use super::router;
use super::spec::{HttpMethod, Operation};
use crate::errors::InvocationError;

/// A fully constructed request, ready for the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    /// Base headers, routed header parameters, then the body content type,
    /// in that order and without deduplication; later entries win wherever
    /// the transport collapses duplicates.
    pub headers: Vec<(String, String)>,
    /// Routed cookie parameters. Outside the transport contract; kept for
    /// inspection.
    pub cookies: Vec<(String, String)>,
    pub payload: RequestPayload,
}

/// Build the outbound request: validate the verb, route parameters,
/// synthesize the body, and substitute path parameters into the URL
/// template.
pub fn build_request(
    operation: &Operation,
    base_headers: &[(String, String)],
    input: &Map<String, Value>,
) -> Result<SynthesizedRequest, InvocationError> {
    let method = HttpMethod::parse(&operation.method)?;
    let routed = router::route_parameters(&operation.parameters, input)?;
    let synthesized = body::synthesize_body(operation.request_body.as_ref(), input)?;

    let mut url = operation.url.clone();
    for (name, value) in &routed.path {
        // Literal substring replacement; no URL escaping is applied.
        url = url.replace(&format!("{{{name}}}"), &plain_string(value));
    }

    let mut headers: Vec<(String, String)> = base_headers.to_vec();
    headers.extend(
        routed
            .header
            .iter()
            .map(|(name, value)| (name.clone(), plain_string(value))),
    );
    if let Some(body) = &synthesized {
        headers.push(("Content-Type".to_string(), body.content_type.clone()));
    }

    let query = routed
        .query
        .iter()
        .map(|(name, value)| (name.clone(), plain_string(value)))
        .collect();
    let cookies = routed
        .cookie
        .iter()
        .map(|(name, value)| (name.clone(), plain_string(value)))
        .collect();

    Ok(SynthesizedRequest {
        method,
        url,
        query,
        headers,
        cookies,
        payload: synthesized.map(|b| b.into_payload()).unwrap_or(RequestPayload::Empty),
    })
}
