//! Raw-text scanning for pages whose structured data was missing or unusable.

use serde_json::Value;
use tracing::{debug, warn};

use crate::json::Probe;
use crate::pipeline::patterns::PatternTable;
use crate::pipeline::unescape::clean_candidate;

/// Result of a raw-text scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOutcome {
    pub video_url: Option<String>,
    /// Patterns tried, including the one that hit
    pub strategies_attempted: usize,
}

/// Scan `body` with the primary patterns, then the case-insensitive
/// fallbacks, then the preloader blob.
pub fn resolve_raw(body: &str, patterns: &PatternTable) -> RawOutcome {
    let mut attempted = 0;

    for (tier, regexes) in [("primary", &patterns.primary), ("fallback", &patterns.fallback)] {
        for (i, regex) in regexes.iter().enumerate() {
            attempted += 1;
            let hit = regex
                .captures_iter(body)
                .filter_map(|c| c.get(1))
                .find_map(|m| clean_candidate(m.as_str()));
            if let Some(url) = hit {
                debug!(tier, pattern = i, "Raw pattern matched");
                return RawOutcome {
                    video_url: Some(url),
                    strategies_attempted: attempted,
                };
            }
        }
    }

    attempted += 1;
    let video_url = preloader_url(body, patterns);
    if video_url.is_some() {
        debug!("Preloader blob matched");
    }
    RawOutcome {
        video_url,
        strategies_attempted: attempted,
    }
}

fn preloader_url(body: &str, patterns: &PatternTable) -> Option<String> {
    let start = patterns.preloader.captures(body)?.get(1)?.start();
    // The blob nests arbitrarily, so read exactly one JSON value from the landmark
    let blob = match serde_json::Deserializer::from_str(&body[start..])
        .into_iter::<Value>()
        .next()?
    {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "Preloader blob matched but did not decode");
            return None;
        }
    };
    let url = Probe::new(&blob)
        .key("__bbox")
        .key("result")
        .key("data")
        .key("xdt_api__v1__media__shortcode__web_info")
        .key("items")
        .first()
        .key("video_versions")
        .first()
        .key("url")
        .str()?;
    clean_candidate(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_og_video_meta() {
        let body = r#"<meta property="og:video" content="https://cdn.example/og.mp4" />"#;
        let outcome = resolve_raw(body, &PatternTable::default());
        assert_eq!(outcome.video_url.as_deref(), Some("https://cdn.example/og.mp4"));
        assert_eq!(outcome.strategies_attempted, 3);
    }

    #[test]
    fn test_escaped_video_url() {
        let body = r#"{"video_url":"https:\/\/cdn.example\/v.mp4?a=1&amp;b=2"}"#;
        let outcome = resolve_raw(body, &PatternTable::default());
        assert_eq!(
            outcome.video_url.as_deref(),
            Some("https://cdn.example/v.mp4?a=1&b=2")
        );
    }

    #[test]
    fn test_fallback_tier_is_case_insensitive() {
        let body = r#"{"Video_Versions":[{"type":101,"url":"https://cdn.example/f"}]}"#;
        let outcome = resolve_raw(body, &PatternTable::default());
        assert_eq!(outcome.video_url.as_deref(), Some("https://cdn.example/f"));
        assert_eq!(outcome.strategies_attempted, 9);
    }

    #[test]
    fn test_relative_match_keeps_scanning() {
        let body = r#"{"url": "/relative/a.mp4", "other_url": "https://cdn.example/c.mp4"}"#;
        let outcome = resolve_raw(body, &PatternTable::default());
        assert_eq!(outcome.video_url.as_deref(), Some("https://cdn.example/c.mp4"));
        assert_eq!(outcome.strategies_attempted, 7);
    }

    #[test]
    fn test_preloader() {
        let body = concat!(
            r#"["PolarisPostRootQueryRelayPreloader_abc",{"__bbox":{"complete":true,"result":{"data":"#,
            r#"{"xdt_api__v1__media__shortcode__web_info":{"items":[{"code":"ABC","video_versions":"#,
            r#"[{"meta":{"w":720},"url":"https://cdn.example/p"}]}]}}}}}]"#,
        );
        let outcome = resolve_raw(body, &PatternTable::default());
        assert_eq!(outcome.video_url.as_deref(), Some("https://cdn.example/p"));
        assert_eq!(outcome.strategies_attempted, 15);
    }

    #[test]
    fn test_truncated_preloader_is_a_miss() {
        let body = r#"["PolarisPostRootQueryRelayPreloader_abc",{"__bbox":{"complete":true,"result":{"data":{"xdt_api__v1__media__shortcode__web_info":{"items":[{"#;
        assert_eq!(resolve_raw(body, &PatternTable::default()).video_url, None);
    }

    #[test]
    fn test_total_miss_counts_every_strategy() {
        let outcome = resolve_raw("<html>nothing here</html>", &PatternTable::default());
        assert_eq!(outcome.video_url, None);
        assert_eq!(outcome.strategies_attempted, 8 + 6 + 1);
    }
}
