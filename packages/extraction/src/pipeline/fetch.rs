//! Upstream page fetching over an ordered list of candidates.
//!
//! Candidates are tried strictly in order and never raced. The first 2xx
//! wins; 404, 429 and other 4xx/5xx statuses stop the loop immediately.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{ExtractionError, Result, TransportError};
use crate::pipeline::patterns::PatternTable;
use crate::traits::sink::PageSink;
use crate::traits::transport::{Transport, TransportRequest, TransportResponse};
use crate::types::{page::RawPage, shortcode::Shortcode};

pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const MOBILE_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.0 Mobile/15E148 Safari/604.1";

/// Which browser the request pretends to come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientIdentity {
    Desktop,
    Mobile,
}

impl ClientIdentity {
    pub fn user_agent(&self) -> &'static str {
        match self {
            Self::Desktop => DESKTOP_USER_AGENT,
            Self::Mobile => MOBILE_USER_AGENT,
        }
    }
}

/// One (URL, identity) pairing to try.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCandidate {
    pub url: String,
    pub identity: ClientIdentity,
}

/// The fixed, ordered candidate list for a shortcode.
pub fn candidates(base_url: &str, shortcode: &Shortcode) -> Vec<FetchCandidate> {
    let base = base_url.trim_end_matches('/');
    vec![
        FetchCandidate {
            url: format!("{base}/p/{shortcode}/"),
            identity: ClientIdentity::Desktop,
        },
        FetchCandidate {
            url: format!("{base}/reel/{shortcode}/"),
            identity: ClientIdentity::Desktop,
        },
        FetchCandidate {
            url: format!("{base}/p/{shortcode}/"),
            identity: ClientIdentity::Mobile,
        },
        FetchCandidate {
            url: format!("{base}/reel/{shortcode}/?__a=1&__d=dis"),
            identity: ClientIdentity::Mobile,
        },
    ]
}

fn build_request(candidate: &FetchCandidate, timeout: Duration) -> TransportRequest {
    TransportRequest::new(&candidate.url)
        .with_timeout(timeout)
        .with_header("User-Agent", candidate.identity.user_agent())
        .with_header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        )
        .with_header("Accept-Language", "en-US,en;q=0.5")
        .with_header("Cache-Control", "no-cache")
        .with_header("Pragma", "no-cache")
        .with_header("Referer", "https://www.instagram.com/")
        .with_header("sec-fetch-dest", "document")
        .with_header("sec-fetch-mode", "navigate")
        .with_header("sec-fetch-site", "same-origin")
        .with_header("sec-fetch-user", "?1")
        .with_header("upgrade-insecure-requests", "1")
}

/// Fetches the page for a shortcode through an injected transport.
pub struct UpstreamFetcher {
    transport: Arc<dyn Transport>,
    patterns: Arc<PatternTable>,
    base_url: String,
    timeout: Duration,
    sink: Option<Arc<dyn PageSink>>,
}

impl UpstreamFetcher {
    pub fn new(
        transport: Arc<dyn Transport>,
        patterns: Arc<PatternTable>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            patterns,
            base_url: base_url.into(),
            timeout,
            sink: None,
        }
    }

    /// Hand every accepted body to `sink`.
    pub fn with_sink(mut self, sink: Arc<dyn PageSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub async fn fetch(&self, shortcode: &Shortcode) -> Result<RawPage> {
        let mut last_transport_error: Option<TransportError> = None;
        let mut saw_status = false;

        for (attempt, candidate) in candidates(&self.base_url, shortcode).iter().enumerate() {
            debug!(
                shortcode = %shortcode,
                attempt = attempt + 1,
                url = %candidate.url,
                identity = ?candidate.identity,
                transport = self.transport.name(),
                "Fetching candidate"
            );

            let request = build_request(candidate, self.timeout);
            let response = match self.transport.get(&request).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(url = %candidate.url, error = %e, "Candidate failed at transport level");
                    last_transport_error = Some(e);
                    continue;
                }
            };

            if response.is_success() {
                return self.accept(shortcode, candidate, response).await;
            }

            match response.status {
                404 => {
                    info!(url = %candidate.url, "Upstream returned 404");
                    return Err(ExtractionError::not_found(format!("content {shortcode}")));
                }
                429 => {
                    let retry_after = response.header("retry-after").map(str::to_string);
                    warn!(url = %candidate.url, retry_after = ?retry_after, "Upstream rate limited");
                    return Err(ExtractionError::RateLimited { retry_after });
                }
                status if status >= 400 => {
                    warn!(url = %candidate.url, status, "Upstream returned error status");
                    return Err(ExtractionError::Upstream {
                        status,
                        url: candidate.url.clone(),
                    });
                }
                status => {
                    warn!(url = %candidate.url, status, "Unexpected status, trying next candidate");
                    saw_status = true;
                }
            }
        }

        if saw_status {
            Err(ExtractionError::not_found(format!("content {shortcode}")))
        } else {
            Err(ExtractionError::Network {
                operation: format!("fetching content {shortcode}"),
                source: last_transport_error,
            })
        }
    }

    async fn accept(
        &self,
        shortcode: &Shortcode,
        candidate: &FetchCandidate,
        response: TransportResponse,
    ) -> Result<RawPage> {
        let body = String::from_utf8(response.body).map_err(|e| ExtractionError::Parsing {
            data_type: "page body".to_string(),
            source: Box::new(e),
        })?;

        if let Some(phrase) = self.patterns.soft_404_match(&body) {
            info!(url = %candidate.url, phrase, "Page reports content unavailable");
            return Err(ExtractionError::not_found(format!("content {shortcode}")));
        }

        let mut page = RawPage::new(&candidate.url, body);
        if let Some(ct) = response.headers.get("content-type") {
            page = page.with_content_type(ct.clone());
        }
        page = page.with_headers(response.headers);

        info!(
            shortcode = %shortcode,
            url = %page.url,
            bytes = page.body.len(),
            "Fetched upstream page"
        );

        if let Some(sink) = &self.sink {
            if let Err(e) = sink.save(shortcode, &page).await {
                warn!(sink = sink.name(), error = %e, "Failed to save page body");
            }
        }

        Ok(page)
    }
}
