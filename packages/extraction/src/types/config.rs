//! Configuration for the extractor.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.instagram.com";
pub const DEFAULT_DOMAIN: &str = "instagram.com";

/// Upper bound on any single upstream request.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(300);

/// Configuration for [`Extractor`](crate::pipeline::extractor::Extractor).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Scheme and host that fetch candidates are built on.
    ///
    /// Default: `https://www.instagram.com`.
    pub base_url: String,

    /// Domain a mirrored URL must belong to (subdomains accepted).
    pub domain: String,

    /// Per-request timeout for page fetches. Clamped to [`MAX_TIMEOUT`].
    #[serde(with = "duration_secs")]
    pub timeout: Duration,

    /// Hand accepted page bodies to the configured sink.
    pub debug: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            domain: DEFAULT_DOMAIN.to_string(),
            timeout: Duration::from_secs(30),
            debug: false,
        }
    }
}

impl ExtractorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Timeout actually applied to requests.
    pub fn effective_timeout(&self) -> Duration {
        self.timeout.min(MAX_TIMEOUT)
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExtractorConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(!config.debug);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = ExtractorConfig::new().with_base_url("http://127.0.0.1:9000/");
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn test_timeout_clamped() {
        let config = ExtractorConfig::new().with_timeout(Duration::from_secs(900));
        assert_eq!(config.effective_timeout(), MAX_TIMEOUT);
    }
}
