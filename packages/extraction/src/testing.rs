//! Testing utilities: page fixtures and a ready-made mock setup.
//!
//! These are useful for testing applications that use the extraction library
//! without making real network calls.

use serde_json::{json, Value};
use std::sync::Arc;

use crate::pipeline::extractor::Extractor;
use crate::transports::MockTransport;
use crate::types::config::ExtractorConfig;

/// An extractor wired to `mock` with default configuration.
pub fn mock_extractor(mock: &MockTransport) -> Extractor {
    Extractor::new(Arc::new(mock.clone()), ExtractorConfig::default())
}

/// Wrap structured data in the `data-sjs` script landmark.
pub fn sjs_page(data: &Value) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><title>Instagram</title></head><body><script type="application/json" data-sjs>{data}</script></body></html>"#
    )
}

/// `require` array with a `PostPage` entry. `owner` is omitted when `None`.
pub fn post_page_data(video_url: &str, owner: Option<&str>, caption: Option<&str>) -> Value {
    let mut media = json!({
        "is_video": true,
        "video_url": video_url,
        "display_url": "https://cdn.example/thumb.jpg",
    });
    if let Some(owner) = owner {
        media["owner"] = json!({ "username": owner });
    }
    if let Some(caption) = caption {
        media["edge_media_to_caption"] = json!({ "edges": [{ "node": { "text": caption } }] });
    }
    json!({
        "require": [
            ["ScheduledServerJS", "handle", null],
            { "0": "PostPage", "1": { "graphql": { "shortcode_media": media } } }
        ]
    })
}

/// Lightweight API-style body: `{"items":[{"video_versions":[...]}]}`.
pub fn api_items_body(video_url: &str) -> String {
    json!({
        "items": [{
            "code": "ABC123",
            "video_versions": [{ "width": 720, "height": 1280, "url": video_url }]
        }]
    })
    .to_string()
}

/// Page with only an `og:video` meta tag.
pub fn og_video_page(video_url: &str) -> String {
    format!(
        r#"<html><head><meta property="og:video" content="{video_url}" /></head><body></body></html>"#
    )
}

/// Page whose only video reference is a `\uXXXX`-escaped URL in script text.
pub fn escaped_script_page(video_url: &str) -> String {
    let escaped: String = video_url
        .chars()
        .map(|c| match c {
            '/' | '?' | '=' | '&' => format!("\\u{:04X}", c as u32),
            c => c.to_string(),
        })
        .collect();
    format!(r#"<html><script>var media = {{"video_url":"{escaped}"}};</script></html>"#)
}

/// 200 page that says the content is gone.
pub fn soft_404_page() -> String {
    r#"<html><body><h2>Sorry, this page isn't available.</h2><p>The link you followed may be broken, or the page may have been removed.</p></body></html>"#.to_string()
}

/// Page with nothing extractable.
pub fn empty_page() -> String {
    "<html><head><title>Instagram</title></head><body><div id=\"root\"></div></body></html>"
        .to_string()
}
