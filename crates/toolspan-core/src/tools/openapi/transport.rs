//! HTTP transport seam for OpenAPI tools
//!
//! The synthesizer never opens sockets itself; it hands a
//! [`SynthesizedRequest`] to an injectable [`HttpTransport`]. Production use
//! goes through [`ReqwestTransport`]; tests substitute a capturing mock.

use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::Client;
use std::time::Duration;

use super::coerce::plain_string;
use super::request::SynthesizedRequest;
use super::RequestPayload;
use crate::errors::InvocationError;

/// Raw response handed back by a transport.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn dispatch(
        &self,
        request: &SynthesizedRequest,
    ) -> Result<TransportResponse, InvocationError>;
}

/// Transport backed by a shared reqwest client with redirect following
/// enabled. Timeout policy lives here, not in the synthesizer.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .redirect(Policy::limited(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn dispatch(
        &self,
        request: &SynthesizedRequest,
    ) -> Result<TransportResponse, InvocationError> {
        use super::spec::HttpMethod;

        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Patch => reqwest::Method::PATCH,
        };

        let mut builder = self.client.request(method, &request.url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        builder = match &request.payload {
            RequestPayload::Empty => builder,
            RequestPayload::Text(text) => builder.body(text.clone()),
            RequestPayload::Fields(fields) => {
                let pairs: Vec<(String, String)> = fields
                    .iter()
                    .map(|(name, value)| (name.clone(), plain_string(value)))
                    .collect();
                builder.form(&pairs)
            }
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(TransportResponse { status, body })
    }
}
