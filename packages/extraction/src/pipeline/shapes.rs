//! Known layouts of embedded structured data.
//!
//! Each [`Shape`] knows where one page-template revision keeps the video URL.
//! [`SHAPES`] is tried in order and the first hit wins.

use serde_json::Value;
use tracing::debug;

use crate::json::Probe;
use crate::pipeline::unescape::clean_candidate;
use crate::types::shortcode::Shortcode;

/// A named structured-data strategy.
#[derive(Debug, Clone, Copy)]
pub struct Shape {
    pub name: &'static str,
    pub resolve: fn(Probe<'_>, &Shortcode) -> Option<String>,
}

/// Structured strategies in priority order.
pub const SHAPES: &[Shape] = &[
    Shape {
        name: "require-post-page",
        resolve: require_post_page,
    },
    Shape {
        name: "entry-data",
        resolve: entry_data,
    },
    Shape {
        name: "api-items",
        resolve: api_items,
    },
    Shape {
        name: "apollo-cache",
        resolve: apollo_cache,
    },
    Shape {
        name: "graphql",
        resolve: graphql,
    },
];

/// Run every shape against `data` and return the first usable URL.
pub fn resolve_structured(data: &Value, shortcode: &Shortcode) -> Option<String> {
    let root = Probe::new(data);
    for shape in SHAPES {
        let Some(raw) = (shape.resolve)(root, shortcode) else {
            continue;
        };
        match clean_candidate(&raw) {
            Some(url) => {
                debug!(shape = shape.name, shortcode = %shortcode, "Structured shape matched");
                return Some(url);
            }
            None => debug!(shape = shape.name, "Shape produced an unusable URL"),
        }
    }
    None
}

/// Shared lookup used by most shapes: an explicit video URL when the media is
/// flagged as video, else the first rendition.
pub fn media_video_url(media: Probe<'_>) -> Option<String> {
    if media.key("is_video").bool() == Some(true) {
        if let Some(url) = media.key("video_url").non_empty_str() {
            return Some(url.to_string());
        }
    }
    media
        .key("video_versions")
        .first()
        .key("url")
        .non_empty_str()
        .map(str::to_string)
}

/// The `graphql.shortcode_media` node inside a `PostPage` entry of the
/// `require` array, if any entry has one.
pub fn require_post_page_media(root: Probe<'_>) -> Option<Probe<'_>> {
    root.key("require")
        .array()?
        .iter()
        .map(Probe::new)
        .filter(|entry| entry.key("0").str() == Some("PostPage"))
        .map(|entry| entry.key("1").key("graphql").key("shortcode_media"))
        .find(|media| media.exists())
}

/// First `PostPage` entry flagged as video; non-video entries are skipped.
fn require_post_page(root: Probe<'_>, _: &Shortcode) -> Option<String> {
    root.key("require")
        .array()?
        .iter()
        .map(Probe::new)
        .filter(|entry| entry.key("0").str() == Some("PostPage"))
        .map(|entry| entry.key("1").key("graphql").key("shortcode_media"))
        .filter(|media| media.key("is_video").bool() == Some(true))
        .find_map(|media| media.key("video_url").non_empty_str())
        .map(str::to_string)
}

fn entry_data(root: Probe<'_>, _: &Shortcode) -> Option<String> {
    media_video_url(
        root.key("entry_data")
            .key("PostPage")
            .first()
            .key("shortcode_media"),
    )
}

fn api_items(root: Probe<'_>, _: &Shortcode) -> Option<String> {
    media_video_url(root.key("items").first())
}

fn apollo_cache(root: Probe<'_>, shortcode: &Shortcode) -> Option<String> {
    if !root.key("ROOT_QUERY").exists() {
        return None;
    }
    let media_key = format!("Media:{shortcode}");
    let shortcode_key = format!("ShortcodeMedia:{shortcode}");

    root.object()?
        .iter()
        .filter(|(key, _)| key.contains(&media_key) || key.contains(&shortcode_key))
        .find_map(|(_, node)| {
            let node = Probe::new(node);
            node.key("video_url")
                .non_empty_str()
                .or_else(|| node.key("videoUrl").non_empty_str())
                .map(str::to_string)
        })
}

fn graphql(root: Probe<'_>, _: &Shortcode) -> Option<String> {
    media_video_url(root.key("graphql").key("shortcode_media"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn code() -> Shortcode {
        Shortcode::new("ABC123").unwrap()
    }

    #[test]
    fn test_require_post_page() {
        let data = json!({"require": [
            {"0": "Other", "1": {}},
            {"0": "PostPage", "1": {"graphql": {"shortcode_media": {
                "is_video": true,
                "video_url": "https://cdn.example/a.mp4"
            }}}}
        ]});
        assert_eq!(
            resolve_structured(&data, &code()).as_deref(),
            Some("https://cdn.example/a.mp4")
        );
    }

    #[test]
    fn test_require_post_page_not_video() {
        let data = json!({"require": [
            {"0": "PostPage", "1": {"graphql": {"shortcode_media": {
                "is_video": false,
                "video_url": "https://cdn.example/a.mp4"
            }}}}
        ]});
        assert_eq!(resolve_structured(&data, &code()), None);
    }

    #[test]
    fn test_require_post_page_skips_non_video_entry() {
        let data = json!({"require": [
            {"0": "PostPage", "1": {"graphql": {"shortcode_media": {
                "is_video": false,
                "display_url": "https://cdn.example/photo.jpg"
            }}}},
            {"0": "PostPage", "1": {"graphql": {"shortcode_media": {
                "is_video": true,
                "video_url": "https://cdn.example/second.mp4"
            }}}}
        ]});
        assert_eq!(
            resolve_structured(&data, &code()).as_deref(),
            Some("https://cdn.example/second.mp4")
        );
    }

    #[test]
    fn test_entry_data_falls_back_to_versions() {
        let data = json!({"entry_data": {"PostPage": [{"shortcode_media": {
            "is_video": false,
            "video_versions": [{"url": "https://cdn.example/b.mp4"}]
        }}]}});
        assert_eq!(
            resolve_structured(&data, &code()).as_deref(),
            Some("https://cdn.example/b.mp4")
        );
    }

    #[test]
    fn test_api_items() {
        let data = json!({"items": [{"video_versions": [{"url": "https://cdn.example/a.mp4"}]}]});
        assert_eq!(
            resolve_structured(&data, &code()).as_deref(),
            Some("https://cdn.example/a.mp4")
        );
    }

    #[test]
    fn test_apollo_cache_needs_root_query() {
        let node = json!({"videoUrl": "https://cdn.example/d.mp4"});
        let with_root = json!({"ROOT_QUERY": {}, "ShortcodeMedia:ABC123": node});
        let without_root = json!({"ShortcodeMedia:ABC123": node});

        assert_eq!(
            resolve_structured(&with_root, &code()).as_deref(),
            Some("https://cdn.example/d.mp4")
        );
        assert_eq!(resolve_structured(&without_root, &code()), None);
    }

    #[test]
    fn test_apollo_cache_ignores_other_media() {
        let data = json!({
            "ROOT_QUERY": {},
            "Media:OTHER": {"video_url": "https://cdn.example/wrong.mp4"}
        });
        assert_eq!(resolve_structured(&data, &code()), None);
    }

    #[test]
    fn test_graphql() {
        let data = json!({"graphql": {"shortcode_media": {
            "is_video": true,
            "video_url": "https://cdn.example/e.mp4"
        }}});
        assert_eq!(
            resolve_structured(&data, &code()).as_deref(),
            Some("https://cdn.example/e.mp4")
        );
    }

    #[test]
    fn test_earlier_shape_wins() {
        let data = json!({
            "items": [{"video_versions": [{"url": "https://cdn.example/items.mp4"}]}],
            "graphql": {"shortcode_media": {"is_video": true, "video_url": "https://cdn.example/g.mp4"}}
        });
        assert_eq!(
            resolve_structured(&data, &code()).as_deref(),
            Some("https://cdn.example/items.mp4")
        );
    }

    #[test]
    fn test_relative_url_is_a_miss() {
        let data = json!({"items": [{"video_versions": [{"url": "/local/a.mp4"}]}]});
        assert_eq!(resolve_structured(&data, &code()), None);
    }

    #[test]
    fn test_unrecognized_shape() {
        assert_eq!(resolve_structured(&json!({"foo": 1}), &code()), None);
    }
}
