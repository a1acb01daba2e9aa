//! Non-panicking navigation over decoded page data.
//!
//! Upstream JSON changes shape without notice, so every lookup here yields
//! another probe rather than indexing directly. A probe that has gone missing
//! stays missing; the terminal accessors (`str`, `bool`, ...) return `None`.
//!
//! ```rust
//! use extraction::json::Probe;
//! use serde_json::json;
//!
//! let data = json!({"items": [{"video_versions": [{"url": "https://cdn/a.mp4"}]}]});
//! let url = Probe::new(&data)
//!     .key("items")
//!     .first()
//!     .key("video_versions")
//!     .first()
//!     .key("url")
//!     .str();
//! assert_eq!(url, Some("https://cdn/a.mp4"));
//! assert_eq!(Probe::new(&data).key("nope").index(3).str(), None);
//! ```

use serde_json::{Map, Value};

/// A cursor into a JSON tree that may point at nothing.
#[derive(Debug, Clone, Copy)]
pub struct Probe<'a>(Option<&'a Value>);

impl<'a> Probe<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self(Some(value))
    }

    /// Descend into an object field.
    pub fn key(self, name: &str) -> Self {
        Self(self.0.and_then(|v| v.as_object()).and_then(|o| o.get(name)))
    }

    /// Descend into an array element.
    pub fn index(self, i: usize) -> Self {
        Self(self.0.and_then(|v| v.as_array()).and_then(|a| a.get(i)))
    }

    pub fn first(self) -> Self {
        self.index(0)
    }

    pub fn str(self) -> Option<&'a str> {
        self.0.and_then(|v| v.as_str())
    }

    pub fn bool(self) -> Option<bool> {
        self.0.and_then(|v| v.as_bool())
    }

    pub fn array(self) -> Option<&'a Vec<Value>> {
        self.0.and_then(|v| v.as_array())
    }

    pub fn object(self) -> Option<&'a Map<String, Value>> {
        self.0.and_then(|v| v.as_object())
    }

    pub fn value(self) -> Option<&'a Value> {
        self.0
    }

    pub fn exists(self) -> bool {
        self.0.is_some()
    }

    /// Non-empty string.
    pub fn non_empty_str(self) -> Option<&'a str> {
        self.str().filter(|s| !s.is_empty())
    }
}

impl<'a> From<&'a Value> for Probe<'a> {
    fn from(value: &'a Value) -> Self {
        Self::new(value)
    }
}
