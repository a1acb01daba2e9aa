//! The Extractor - main entry point for the extraction library.
//!
//! Turns a mirrored content URL into a playable video URL:
//!
//! ```text
//! parse id → fetch → locate structured data ─ found → shapes ─ hit → done
//!                                          │                 └ miss ┐
//!                                          └ none ──────────────────┴→ raw scan → done / Extraction
//! ```
//!
//! The extractor holds no per-request state. Share it behind an `Arc`.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{ExtractionError, Result};
use crate::pipeline::{
    fetch::UpstreamFetcher,
    locate::locate,
    metadata::enrich,
    patterns::PatternTable,
    raw::resolve_raw,
    shapes::{resolve_structured, SHAPES},
};
use crate::traits::{sink::PageSink, transport::Transport};
use crate::types::{config::ExtractorConfig, media::MediaResolution, shortcode::Shortcode};

/// Resolves mirrored URLs to video URLs.
///
/// # Example
///
/// ```rust,ignore
/// let extractor = Extractor::new(Arc::new(HttpTransport::new()), ExtractorConfig::default());
/// let media = extractor.resolve("https://www.instagram.com/reel/ABC123/").await?;
/// println!("{} -> {}", media.file_name, media.video_url);
/// ```
pub struct Extractor {
    transport: Arc<dyn Transport>,
    config: ExtractorConfig,
    patterns: Arc<PatternTable>,
    sink: Option<Arc<dyn PageSink>>,
}

impl Extractor {
    /// Create an extractor with the built-in pattern table.
    pub fn new(transport: Arc<dyn Transport>, config: ExtractorConfig) -> Self {
        Self {
            transport,
            config,
            patterns: Arc::new(PatternTable::default()),
            sink: None,
        }
    }

    /// Replace the heuristic tables.
    pub fn with_patterns(mut self, patterns: Arc<PatternTable>) -> Self {
        self.patterns = patterns;
        self
    }

    /// Set the sink that receives page bodies when `config.debug` is on.
    pub fn with_sink(mut self, sink: Arc<dyn PageSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Parse the content identifier out of a mirrored URL.
    pub fn parse(&self, url: &str) -> Result<Shortcode> {
        Shortcode::parse(url, &self.config.domain)
    }

    /// Resolve a mirrored content URL to its video.
    pub async fn resolve(&self, url: &str) -> Result<MediaResolution> {
        let shortcode = self.parse(url)?;
        self.resolve_shortcode(&shortcode).await
    }

    /// Resolve an already-parsed identifier.
    pub async fn resolve_shortcode(&self, shortcode: &Shortcode) -> Result<MediaResolution> {
        info!(shortcode = %shortcode, "Resolving media");

        let page = self.fetcher().fetch(shortcode).await?;

        let mut strategies = 0;
        if let Some(data) = locate(&page, &self.patterns) {
            strategies += SHAPES.len();
            if let Some(video_url) = resolve_structured(&data, shortcode) {
                let metadata = enrich(&data);
                info!(
                    shortcode = %shortcode,
                    username = ?metadata.username,
                    "Resolved media from structured data"
                );
                return Ok(MediaResolution::new(shortcode, video_url).with_metadata(metadata));
            }
            debug!(shortcode = %shortcode, "Structured data matched no known shape");
        }

        let outcome = resolve_raw(&page.body, &self.patterns);
        strategies += outcome.strategies_attempted;

        match outcome.video_url {
            Some(video_url) => {
                info!(shortcode = %shortcode, "Resolved media from raw page text");
                Ok(MediaResolution::new(shortcode, video_url))
            }
            None => {
                warn!(
                    shortcode = %shortcode,
                    url = %page.url,
                    strategies,
                    "No strategy located a video URL"
                );
                Err(ExtractionError::Extraction {
                    shortcode: shortcode.to_string(),
                    strategies,
                })
            }
        }
    }

    fn fetcher(&self) -> UpstreamFetcher {
        let fetcher = UpstreamFetcher::new(
            Arc::clone(&self.transport),
            Arc::clone(&self.patterns),
            self.config.base_url.clone(),
            self.config.effective_timeout(),
        );
        match (&self.sink, self.config.debug) {
            (Some(sink), true) => fetcher.with_sink(Arc::clone(sink)),
            _ => fetcher,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::sinks::MemorySink;
    use crate::transports::MockTransport;

    fn extractor(mock: &MockTransport) -> Extractor {
        Extractor::new(Arc::new(mock.clone()), ExtractorConfig::default())
    }

    #[tokio::test]
    async fn test_invalid_url_makes_no_calls() {
        let mock = MockTransport::new();
        let err = extractor(&mock)
            .resolve("https://example.com/reel/ABC/")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidUrl);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_structured_miss_counts_shapes_and_raw() {
        let mock = MockTransport::new().respond(200, r#"{"items":[{"id":"1"}]}"#);
        let err = extractor(&mock)
            .resolve("https://www.instagram.com/reel/ABC123/")
            .await
            .unwrap_err();
        match err {
            ExtractionError::Extraction { strategies, .. } => {
                assert_eq!(strategies, SHAPES.len() + 15)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_sink_only_used_in_debug() {
        let body = r#"<meta property="og:video" content="https://cdn.example/a.mp4">"#;

        let sink = MemorySink::new();
        let mock = MockTransport::new().respond(200, body);
        Extractor::new(Arc::new(mock), ExtractorConfig::default())
            .with_sink(Arc::new(sink.clone()))
            .resolve("https://www.instagram.com/p/ABC/")
            .await
            .unwrap();
        assert!(sink.is_empty());

        let mock = MockTransport::new().respond(200, body);
        Extractor::new(Arc::new(mock), ExtractorConfig::default().with_debug(true))
            .with_sink(Arc::new(sink.clone()))
            .resolve("https://www.instagram.com/p/ABC/")
            .await
            .unwrap();
        assert_eq!(sink.len(), 1);
    }

    #[tokio::test]
    async fn test_uses_configured_base_url() {
        let mock = MockTransport::new()
            .respond(200, r#"{"items":[{"video_versions":[{"url":"https://cdn/a.mp4"}]}]}"#);
        Extractor::new(
            Arc::new(mock.clone()),
            ExtractorConfig::default().with_base_url("http://127.0.0.1:9999"),
        )
        .resolve("https://www.instagram.com/reel/ABC/")
        .await
        .unwrap();
        assert_eq!(mock.requested_urls(), vec!["http://127.0.0.1:9999/p/ABC/"]);
    }
}
