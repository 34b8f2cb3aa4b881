use crate::castersphere_api::types::TransportError;
use std::future::Future;
use std::pin::Pin;

/// HTTP method used by room service calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// A fully built request, ready for a transport to send
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// JSON body, present for POST calls
    pub body: Option<serde_json::Value>,
}

impl OutboundRequest {
    /// First header value with the given name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Whatever the room service answered, before normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Future returned by [`HttpTransport::send`]
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<RawResponse, TransportError>> + Send + 'a>>;

/// HTTP transport trait
///
/// Abstracts the actual network call so the client can run against
/// `reqwest`, a test double, or a host application's own HTTP stack.
/// Timeouts, pooling and retries belong to the implementation.
pub trait HttpTransport: Send + Sync {
    /// Send a request and return the raw response
    fn send(&self, request: OutboundRequest) -> TransportFuture<'_>;
}

/// [`HttpTransport`] backed by `reqwest`
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured `reqwest::Client` (timeouts, proxies, TLS)
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(&self, request: OutboundRequest) -> TransportFuture<'_> {
        Box::pin(async move {
            let mut builder = match request.method {
                HttpMethod::Get => self.client.get(&request.url),
                HttpMethod::Post => self.client.post(&request.url),
            };

            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }

            let response = builder.send().await.map_err(|e| {
                tracing::error!(
                    "Failed to send {} request to {}: {}",
                    request.method.as_str(),
                    request.url,
                    e
                );
                TransportError::from(e)
            })?;

            let status = response.status().as_u16();
            let body = response.bytes().await.map_err(|e| {
                tracing::error!("Failed to read response body: {}", e);
                TransportError::from(e)
            })?;

            Ok(RawResponse {
                status,
                body: body.to_vec(),
            })
        })
    }
}
