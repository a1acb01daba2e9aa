//! HTTP error mapping.
//!
//! Handlers return [`AppError`]. Its response is JSON; the `render_error_pages`
//! middleware swaps in the HTML page when the client asked for `text/html`.

use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Response},
    Json,
};
use extraction::{ErrorKind, ExtractionError};
use serde_json::json;
use tracing::{error, warn};

use crate::server::templates::render_error_page;

/// Errors surfaced by HTTP handlers
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// The video CDN refused the passthrough request
    #[error("video host responded with status {status}")]
    VideoUpstream { status: u16 },

    /// The video CDN could not be reached
    #[error("video host unreachable: {0}")]
    VideoTransport(#[source] reqwest::Error),

    /// The video CDN stopped responding
    #[error("video host sent nothing for {}s", .idle.as_secs())]
    VideoTimeout { idle: std::time::Duration },

    #[error("page not found: {path}")]
    RouteNotFound { path: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Extraction(e) => match e.kind() {
                ErrorKind::InvalidUrl => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                ErrorKind::Unsupported => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                ErrorKind::Upstream
                | ErrorKind::Network
                | ErrorKind::Extraction
                | ErrorKind::Parsing => StatusCode::BAD_GATEWAY,
            },
            Self::VideoUpstream { .. } | Self::VideoTransport(_) | Self::VideoTimeout { .. } => {
                StatusCode::BAD_GATEWAY
            }
            Self::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error type
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Extraction(e) => e.kind().as_str(),
            Self::VideoUpstream { .. } => ErrorKind::Upstream.as_str(),
            Self::VideoTransport(_) | Self::VideoTimeout { .. } => ErrorKind::Network.as_str(),
            Self::RouteNotFound { .. } => ErrorKind::NotFound.as_str(),
            Self::Internal(_) => "internal",
        }
    }

    /// Message shown to the client
    pub fn public_message(&self) -> String {
        match self {
            Self::Extraction(e) => match e.kind() {
                ErrorKind::InvalidUrl => "Invalid content URL".to_string(),
                ErrorKind::NotFound => "Content not found or unavailable".to_string(),
                ErrorKind::RateLimited => "Rate limited by upstream, try again later".to_string(),
                ErrorKind::Unsupported => "This content type is not supported".to_string(),
                ErrorKind::Network => "Could not reach the upstream service".to_string(),
                ErrorKind::Upstream => "Upstream service returned an error".to_string(),
                ErrorKind::Extraction | ErrorKind::Parsing => {
                    "Could not extract a video from this content".to_string()
                }
            },
            Self::VideoUpstream { .. } | Self::VideoTransport(_) | Self::VideoTimeout { .. } => {
                "Content temporarily unavailable".to_string()
            }
            Self::RouteNotFound { .. } => "Page not found".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
        }
    }
}

/// Everything needed to render an error in either format
#[derive(Debug, Clone)]
pub struct ErrorDetails {
    pub status: StatusCode,
    pub error_type: &'static str,
    pub message: String,
    pub details: String,
    pub retry_after: Option<String>,
}

impl ErrorDetails {
    pub fn suggestions(&self) -> &'static [&'static str] {
        suggestions_for(self.error_type)
    }

    fn json_body(&self) -> serde_json::Value {
        json!({
            "error": self.message,
            "status": self.status.canonical_reason().unwrap_or("Error"),
            "code": self.status.as_u16(),
            "type": self.error_type,
        })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() && !matches!(self, Self::Extraction(_)) {
            error!(error = %self, status = status.as_u16(), "Request failed");
        } else {
            warn!(error = %self, status = status.as_u16(), kind = self.error_type(), "Request failed");
        }

        let retry_after = match &self {
            Self::Extraction(e) => e.retry_after().map(str::to_string),
            _ => None,
        };
        let details = ErrorDetails {
            status,
            error_type: self.error_type(),
            message: self.public_message(),
            details: format!("Error type: {}", self.error_type()),
            retry_after,
        };

        let mut response = (status, Json(details.json_body())).into_response();
        if let Some(value) = details
            .retry_after
            .as_deref()
            .and_then(|v| HeaderValue::from_str(v).ok())
        {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
        response.extensions_mut().insert(details);
        response
    }
}

/// Suggestions shown on the HTML error page
pub fn suggestions_for(error_type: &str) -> &'static [&'static str] {
    match error_type {
        "network" | "upstream" => &[
            "Check your internet connection",
            "Try again in a few minutes",
            "The service may be temporarily unavailable",
        ],
        "invalid_url" => &[
            "Verify the URL is correct",
            "Ensure the URL format is /reel/{shortcode}",
            "Check that the content still exists",
        ],
        "not_found" => &[
            "Make sure the post is public",
            "Verify the URL is correct",
            "The content may have been deleted",
        ],
        "rate_limited" => &[
            "Wait a few minutes before trying again",
            "Reduce the frequency of requests",
        ],
        "unsupported" => &[
            "Only reels, posts and TV videos can be relayed",
            "Stories and image posts are not supported",
        ],
        _ => &[
            "Try refreshing the page",
            "Contact support if the problem persists",
        ],
    }
}

/// Whether the client prefers an HTML page over JSON
pub fn wants_html(headers: &HeaderMap) -> bool {
    let accept = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    accept.contains("text/html") && !accept.starts_with("application/json")
}

/// Middleware that renders error responses as HTML for browsers
pub async fn render_error_pages(request: Request, next: Next) -> Response {
    let html = wants_html(request.headers());
    let response = next.run(request).await;

    if !html {
        return response;
    }
    let Some(details) = response.extensions().get::<ErrorDetails>().cloned() else {
        return response;
    };

    let mut page = match render_error_page(&details) {
        Ok(body) => (details.status, Html(body)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render error page");
            return response;
        }
    };
    if let Some(retry) = response.headers().get(header::RETRY_AFTER) {
        page.headers_mut().insert(header::RETRY_AFTER, retry.clone());
    }
    page
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ExtractionError::invalid_url("x", "bad"), StatusCode::BAD_REQUEST),
            (ExtractionError::not_found("x"), StatusCode::NOT_FOUND),
            (
                ExtractionError::RateLimited { retry_after: None },
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (
                ExtractionError::unsupported("story"),
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ),
            (
                ExtractionError::Extraction {
                    shortcode: "A".into(),
                    strategies: 1,
                },
                StatusCode::BAD_GATEWAY,
            ),
            (
                ExtractionError::Upstream {
                    status: 500,
                    url: "u".into(),
                },
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(AppError::from(err).status(), expected);
        }
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_wants_html() {
        let mut headers = HeaderMap::new();
        assert!(!wants_html(&headers));

        headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
        assert!(!wants_html(&headers));

        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,*/*;q=0.8"),
        );
        assert!(wants_html(&headers));

        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json, text/html;q=0.1"),
        );
        assert!(!wants_html(&headers));
    }

    #[test]
    fn test_json_body_shape() {
        let response = AppError::from(ExtractionError::not_found("x")).into_response();
        let details = response.extensions().get::<ErrorDetails>().unwrap();
        let body = details.json_body();
        assert_eq!(body["code"], 404);
        assert_eq!(body["status"], "Not Found");
        assert_eq!(body["type"], "not_found");
    }

    #[test]
    fn test_rate_limit_sets_retry_after() {
        let response = AppError::from(ExtractionError::RateLimited {
            retry_after: Some("120".into()),
        })
        .into_response();
        assert_eq!(response.headers()[header::RETRY_AFTER], "120");
    }
}
