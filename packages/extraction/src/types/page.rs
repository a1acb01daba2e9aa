//! Page bodies returned by a successful upstream fetch.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Body of a successful upstream fetch.
///
/// Owned by a single resolve call and dropped once a video URL is found.
#[derive(Debug, Clone)]
pub struct RawPage {
    /// URL of the candidate that succeeded
    pub url: String,

    /// Decoded body text
    pub body: String,

    /// Declared content type, if the upstream sent one
    pub content_type: Option<String>,

    /// Response headers, names lowercased
    pub headers: HashMap<String, String>,

    /// When the page was fetched
    pub fetched_at: DateTime<Utc>,
}

impl RawPage {
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
            content_type: None,
            headers: HashMap::new(),
            fetched_at: Utc::now(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let page = RawPage::new("https://x/p/A/", "<html></html>")
            .with_content_type("application/json; charset=utf-8");
        assert_eq!(
            page.content_type.as_deref(),
            Some("application/json; charset=utf-8")
        );
        assert_eq!(page.url, "https://x/p/A/");
        assert_eq!(RawPage::new("u", "b").content_type, None);
    }
}
