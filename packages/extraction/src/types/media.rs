//! Resolved media and its metadata.

use serde::{Deserialize, Serialize};

use super::shortcode::Shortcode;

/// Best-effort descriptive fields. Any of them may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaMetadata {
    pub username: Option<String>,
    pub caption: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// The outcome of a successful resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaResolution {
    /// Absolute, unescaped video URL
    pub video_url: String,

    /// Always `{identifier}.mp4`
    pub file_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl MediaResolution {
    pub fn new(shortcode: &Shortcode, video_url: impl Into<String>) -> Self {
        Self {
            video_url: video_url.into(),
            file_name: shortcode.file_name(),
            username: None,
            caption: None,
            thumbnail_url: None,
        }
    }

    pub fn with_metadata(mut self, metadata: MediaMetadata) -> Self {
        self.username = metadata.username;
        self.caption = metadata.caption;
        self.thumbnail_url = metadata.thumbnail_url;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case_without_empty_fields() {
        let code = Shortcode::new("ABC123").unwrap();
        let media = MediaResolution::new(&code, "https://cdn.example/a.mp4");
        let json = serde_json::to_value(&media).unwrap();

        assert_eq!(json["videoUrl"], "https://cdn.example/a.mp4");
        assert_eq!(json["fileName"], "ABC123.mp4");
        assert!(json.get("username").is_none());
    }

    #[test]
    fn test_with_metadata() {
        let code = Shortcode::new("X").unwrap();
        let media = MediaResolution::new(&code, "https://v").with_metadata(MediaMetadata {
            username: Some("someone".into()),
            caption: None,
            thumbnail_url: Some("https://t".into()),
        });
        assert_eq!(media.username.as_deref(), Some("someone"));
        assert_eq!(media.caption, None);
        assert_eq!(media.thumbnail_url.as_deref(), Some("https://t"));
    }
}
