//! Content identifiers parsed from mirrored URLs.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ExtractionError, Result};

/// Path markers that precede an identifier.
pub const CONTENT_MARKERS: &[&str] = &["p", "reel", "tv"];

/// Opaque token identifying one piece of remote content.
///
/// Only constructed through [`Shortcode::parse`] or [`Shortcode::new`], both of
/// which enforce the `[A-Za-z0-9_-]+` alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Shortcode(String);

impl Shortcode {
    /// Validate a bare identifier.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if is_valid_identifier(&id) {
            Ok(Self(id))
        } else {
            Err(ExtractionError::invalid_url(id, "identifier contains invalid characters"))
        }
    }

    /// Extract the identifier from a content URL such as
    /// `https://www.instagram.com/reel/ABC123/`.
    ///
    /// The host must be `domain` or a subdomain of it.
    pub fn parse(input: &str, domain: &str) -> Result<Self> {
        let url = Url::parse(input)
            .map_err(|e| ExtractionError::invalid_url(input, format!("not an absolute URL: {e}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ExtractionError::invalid_url(input, "unsupported scheme"));
        }

        let host = url
            .host_str()
            .ok_or_else(|| ExtractionError::invalid_url(input, "missing host"))?
            .to_ascii_lowercase();
        let domain = domain.to_ascii_lowercase();
        if host != domain && !host.ends_with(&format!(".{domain}")) {
            return Err(ExtractionError::invalid_url(input, "not a supported domain"));
        }

        let path = url.path();
        let path = path.strip_suffix('/').unwrap_or(path);
        let segments: Vec<&str> = path.split('/').collect();
        if segments.len() < 3 {
            return Err(ExtractionError::invalid_url(input, "path too short"));
        }

        let marker = segments[segments.len() - 2];
        let id = segments[segments.len() - 1];
        if !CONTENT_MARKERS.contains(&marker) {
            return Err(ExtractionError::invalid_url(input, "unrecognized content type"));
        }
        if !is_valid_identifier(id) {
            return Err(ExtractionError::invalid_url(input, "invalid identifier"));
        }

        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name the relayed video is served under.
    pub fn file_name(&self) -> String {
        format!("{}.mp4", self.0)
    }
}

fn is_valid_identifier(id: &str) -> bool {
    !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

impl fmt::Display for Shortcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Shortcode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Shortcode {
    type Error = ExtractionError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Shortcode> for String {
    fn from(value: Shortcode) -> Self {
        value.0
    }
}
