//! Typed errors for the extraction library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so the HTTP boundary can
//! map every failure to a status code by kind, never by message text.

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while resolving a mirrored content URL.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Input is not a recognized content URL
    #[error("invalid content URL: {url} ({reason})")]
    InvalidUrl { url: String, reason: String },

    /// Remote content does not exist or is inaccessible
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// Upstream is throttling us
    #[error("rate limited by upstream")]
    RateLimited { retry_after: Option<String> },

    /// Upstream returned a definitive, non-retryable status
    #[error("upstream responded with HTTP {status} for {url}")]
    Upstream { status: u16, url: String },

    /// Transport-level failure on every fetch candidate
    #[error("network error during {operation}")]
    Network {
        operation: String,
        #[source]
        source: Option<TransportError>,
    },

    /// Fetch succeeded but no strategy located a video URL
    #[error("failed to extract media for shortcode {shortcode} after {strategies} strategies")]
    Extraction { shortcode: String, strategies: usize },

    /// Data was present but could not be decoded
    #[error("failed to parse {data_type}: {source}")]
    Parsing {
        data_type: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Content is recognized but is not a video
    #[error("unsupported content type: {content_type}")]
    Unsupported { content_type: String },
}

impl ExtractionError {
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn unsupported(content_type: impl Into<String>) -> Self {
        Self::Unsupported {
            content_type: content_type.into(),
        }
    }

    /// The taxonomy entry for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidUrl { .. } => ErrorKind::InvalidUrl,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::Upstream { .. } => ErrorKind::Upstream,
            Self::Network { .. } => ErrorKind::Network,
            Self::Extraction { .. } => ErrorKind::Extraction,
            Self::Parsing { .. } => ErrorKind::Parsing,
            Self::Unsupported { .. } => ErrorKind::Unsupported,
        }
    }

    /// Retry hint from the upstream, if it sent one.
    pub fn retry_after(&self) -> Option<&str> {
        match self {
            Self::RateLimited { retry_after } => retry_after.as_deref(),
            _ => None,
        }
    }
}

/// Closed error taxonomy, serialized in snake_case for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidUrl,
    NotFound,
    RateLimited,
    Upstream,
    Network,
    Extraction,
    Parsing,
    Unsupported,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidUrl => "invalid_url",
            Self::NotFound => "not_found",
            Self::RateLimited => "rate_limited",
            Self::Upstream => "upstream",
            Self::Network => "network",
            Self::Extraction => "extraction",
            Self::Parsing => "parsing",
            Self::Unsupported => "unsupported",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by a [`Transport`](crate::traits::transport::Transport).
///
/// These are always soft failures from the fetcher's point of view: the next
/// candidate is tried.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Request exceeded its timeout
    #[error("timeout fetching: {url}")]
    Timeout { url: String },

    /// DNS resolution or connection failed
    #[error("connection failed for {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Request could not be built or sent
    #[error("request failed for {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Response body could not be read
    #[error("failed reading body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Result type alias for transport operations.
pub type TransportResult<T> = std::result::Result<T, TransportError>;
