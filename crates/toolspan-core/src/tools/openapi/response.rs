//! Normalization of transport responses into a single text result

use serde_json::Value;

use super::transport::TransportResponse;
use crate::errors::InvocationError;

/// Sentinel returned for an empty response body.
pub const EMPTY_RESPONSE_MESSAGE: &str =
    "Empty response from the tool, please check your parameters and try again.";

/// Convert a transport response into the tool's text output.
///
/// Status codes >= 400 fail with the status and raw body text. JSON bodies
/// are re-encoded as JSON text with non-ASCII characters preserved;
/// anything that does not decode as JSON is returned verbatim.
pub fn normalize_response(response: &TransportResponse) -> Result<String, InvocationError> {
    if response.status >= 400 {
        return Err(InvocationError::HttpStatus {
            status: response.status,
            body: response.text(),
        });
    }
    if response.body.is_empty() {
        return Ok(EMPTY_RESPONSE_MESSAGE.to_string());
    }
    match serde_json::from_slice::<Value>(&response.body) {
        Ok(parsed) => {
            Ok(serde_json::to_string(&parsed).unwrap_or_else(|_| response.text()))
        }
        Err(_) => Ok(response.text()),
    }
}
