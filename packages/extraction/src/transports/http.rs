//! reqwest-backed transport.

use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

use crate::error::{TransportError, TransportResult};
use crate::traits::transport::{Transport, TransportRequest, TransportResponse};

/// HTTP transport over a shared `reqwest::Client`.
///
/// Redirects are followed by the client; the timeout comes from each request.
///
/// # Example
///
/// ```rust,ignore
/// use extraction::transports::HttpTransport;
///
/// let transport = HttpTransport::new();
/// let extractor = Extractor::new(Arc::new(transport), ExtractorConfig::default());
/// ```
#[derive(Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn classify(url: &str, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout {
                url: url.to_string(),
            }
        } else if err.is_connect() {
            TransportError::Connect {
                url: url.to_string(),
                source: Box::new(err),
            }
        } else {
            TransportError::Request {
                url: url.to_string(),
                source: Box::new(err),
            }
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, request: &TransportRequest) -> TransportResult<TransportResponse> {
        debug!(url = %request.url, timeout_secs = request.timeout.as_secs(), "HTTP GET starting");

        let mut builder = self.client.get(&request.url).timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::classify(&request.url, e))?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(k, v)| {
                v.to_str()
                    .ok()
                    .map(|v| (k.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout {
                    url: request.url.clone(),
                }
            } else {
                TransportError::Body {
                    url: request.url.clone(),
                    source: Box::new(e),
                }
            }
        })?;

        debug!(url = %request.url, status, bytes = body.len(), "HTTP GET complete");

        Ok(TransportResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}
