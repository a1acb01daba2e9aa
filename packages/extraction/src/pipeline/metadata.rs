//! Best-effort descriptive metadata.

use serde_json::Value;

use crate::json::Probe;
use crate::types::media::MediaMetadata;

/// Read author, caption and thumbnail from structured data.
///
/// Never fails. Descends through the first `require` entry whose
/// `[1].graphql.shortcode_media` exists, without checking the entry tag.
pub fn enrich(data: &Value) -> MediaMetadata {
    let Some(media) = Probe::new(data)
        .key("require")
        .array()
        .into_iter()
        .flatten()
        .map(|entry| Probe::new(entry).key("1").key("graphql").key("shortcode_media"))
        .find(|media| media.exists())
    else {
        return MediaMetadata::default();
    };

    MediaMetadata {
        username: media
            .key("owner")
            .key("username")
            .non_empty_str()
            .map(str::to_string),
        caption: media
            .key("edge_media_to_caption")
            .key("edges")
            .first()
            .key("node")
            .key("text")
            .non_empty_str()
            .map(str::to_string),
        thumbnail_url: media
            .key("display_url")
            .non_empty_str()
            .or_else(|| media.key("thumbnail_src").non_empty_str())
            .map(str::to_string),
    }
}
