//! Transport trait for outbound page fetches.
//!
//! The fetcher never talks to the network directly. It hands a
//! [`TransportRequest`] to whatever `Transport` it was built with, which keeps
//! candidate ordering and status classification testable without sockets.
//!
//! # Usage
//!
//! ```rust,ignore
//! use extraction::traits::transport::{Transport, TransportRequest};
//!
//! let request = TransportRequest::new("https://www.instagram.com/p/ABC/")
//!     .with_header("User-Agent", "Mozilla/5.0 ...")
//!     .with_timeout(Duration::from_secs(30));
//! let response = transport.get(&request).await?;
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::TransportResult;

/// A single GET request.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
}

impl TransportRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A fully buffered response.
#[derive(Debug, Clone, Default)]
pub struct TransportResponse {
    pub status: u16,
    /// Header names are lowercased
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound HTTP capability.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a GET and buffer the body.
    ///
    /// Non-2xx statuses are returned as responses, not errors. Errors are
    /// reserved for failures where no status was received.
    async fn get(&self, request: &TransportRequest) -> TransportResult<TransportResponse>;

    /// Get the transport name for logging.
    fn name(&self) -> &str {
        "unknown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_header_lookup_ignores_case() {
        let req = TransportRequest::new("https://x").with_header("User-Agent", "ua");
        assert_eq!(req.header("user-agent"), Some("ua"));
        assert_eq!(req.header("accept"), None);
    }

    #[test]
    fn test_response_headers_lowercased() {
        let resp = TransportResponse::new(429, "").with_header("Retry-After", "60");
        assert_eq!(resp.header("retry-after"), Some("60"));
        assert_eq!(resp.header("RETRY-AFTER"), Some("60"));
        assert!(!resp.is_success());
    }
}
