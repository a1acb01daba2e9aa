//! Locates embedded JSON in a page body.

use serde_json::Value;
use tracing::{debug, warn};

use crate::pipeline::patterns::{Landmark, PatternTable};
use crate::types::page::RawPage;

/// Walk the landmark table in order and return the first match that decodes
/// to a JSON object.
///
/// `None` means the page carries no recognizable structured data, which is
/// expected for some templates; the raw-text scan takes over.
pub fn locate(page: &RawPage, patterns: &PatternTable) -> Option<Value> {
    for landmark in &patterns.landmarks {
        let Some(text) = match_landmark(landmark, &page.body) else {
            continue;
        };

        match serde_json::from_str::<Value>(text) {
            Ok(value) if value.is_object() => {
                debug!(landmark = landmark.name(), bytes = text.len(), "Found structured data");
                return Some(value);
            }
            Ok(_) => {
                debug!(landmark = landmark.name(), "Landmark decoded to a non-object, skipping");
            }
            Err(e) => {
                warn!(landmark = landmark.name(), error = %e, "Landmark matched but JSON did not decode");
            }
        }
    }

    debug!(url = %page.url, "No structured data found");
    None
}

fn match_landmark<'a>(landmark: &Landmark, body: &'a str) -> Option<&'a str> {
    match landmark {
        Landmark::Capture { regex, .. } => regex
            .captures(body)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str()),
        Landmark::BareJson { prefix, .. } => {
            let trimmed = body.trim();
            trimmed.starts_with(prefix.as_str()).then_some(trimmed)
        }
    }
}
