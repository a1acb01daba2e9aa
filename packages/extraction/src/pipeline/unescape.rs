//! Cleanup for URLs scraped out of script text.

use regex::{Captures, Regex};
use std::sync::LazyLock;
use url::Url;

static UNICODE_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\u([0-9a-fA-F]{4})(?:\\u([0-9a-fA-F]{4}))?").unwrap()
});

/// Decode `\uXXXX` escapes, drop stray backslashes and collapse `&amp;`.
///
/// Surrogate pairs are joined; an unpaired surrogate is dropped.
pub fn unescape(raw: &str) -> String {
    let decoded = UNICODE_ESCAPE.replace_all(raw, |caps: &Captures| {
        let unit = |i: usize| caps.get(i).and_then(|m| u32::from_str_radix(m.as_str(), 16).ok());
        let mut out = String::new();
        match (unit(1), unit(2)) {
            (Some(hi @ 0xD800..=0xDBFF), Some(lo @ 0xDC00..=0xDFFF)) => {
                out.extend(char::from_u32(0x10000 + ((hi - 0xD800) << 10) + (lo - 0xDC00)));
            }
            (first, second) => {
                out.extend(first.and_then(char::from_u32));
                out.extend(second.and_then(char::from_u32));
            }
        }
        out
    });
    decoded.replace('\\', "").replace("&amp;", "&")
}

/// Unescape `raw` and keep it only if it is an absolute http(s) URL.
pub fn clean_candidate(raw: &str) -> Option<String> {
    let cleaned = unescape(raw);
    let parsed = Url::parse(&cleaned).ok()?;
    if matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some() {
        Some(cleaned)
    } else {
        None
    }
}
