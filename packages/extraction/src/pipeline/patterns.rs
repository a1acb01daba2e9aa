//! Heuristic tables: soft-404 phrases, landmarks and raw-text patterns.
//!
//! These drift with upstream template revisions, so they are data rather than
//! code. A [`PatternSpec`] is the serde form (loadable from JSON); a
//! [`PatternTable`] is the compiled form the pipeline consumes.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// How an embedded JSON blob is recognized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LandmarkSpec {
    /// Regex whose first capture group is the JSON text
    Capture { name: String, pattern: String },
    /// The whole body is JSON starting with this prefix
    BareJson { name: String, prefix: String },
}

/// Serializable heuristic tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternSpec {
    /// Phrases that mark a 2xx page as "content unavailable"
    pub soft_404_phrases: Vec<String>,
    pub landmarks: Vec<LandmarkSpec>,
    /// Case-sensitive, scanned first
    pub primary: Vec<String>,
    /// Scanned case-insensitively if every primary pattern misses
    pub fallback: Vec<String>,
    /// Locates the preloader's `{"__bbox": ...}` object; decoding starts at
    /// the first capture group
    pub preloader: String,
}

impl Default for PatternSpec {
    fn default() -> Self {
        Self {
            soft_404_phrases: [
                "Sorry, this page isn't available",
                "The link you followed may be broken",
                "this post is unavailable",
                "content isn't available",
                "this content isn't available right now",
                "this account has been suspended",
                "this account may have been deactivated",
                "Page Not Found",
                "post not found",
                "video not found",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            landmarks: vec![
                capture("data-sjs", r#"<script type="application/json" data-sjs>(.*?)</script>"#),
                capture("additional-data", r"window\.__additionalDataLoaded\('.*?',(.*?)\);"),
                capture(
                    "shared-data",
                    r#"<script type="text/javascript">window\._sharedData = (.*?);</script>"#,
                ),
                capture("apollo-state", r"window\.__APOLLO_STATE__ = (.*?);</script>"),
                capture("initial-data", r"window\.__INITIAL_DATA__ = (.*?);</script>"),
                LandmarkSpec::BareJson {
                    name: "api-items".into(),
                    prefix: r#"{"items":"#.into(),
                },
                LandmarkSpec::BareJson {
                    name: "api-graphql".into(),
                    prefix: r#"{"graphql":"#.into(),
                },
            ],
            primary: [
                r#""video_versions":\[\{"width":\d+,"height":\d+,"url":"(https://[^"]+)""#,
                r#""video_url":"(https://[^"]+)""#,
                r#"property="og:video" content="(https://[^"]+)""#,
                r#"property="og:video:secure_url" content="(https://[^"]+)""#,
                r#""contentUrl":"(https://[^"]+\.mp4[^"]*)""#,
                r#"url":"(https://[^"]+\.mp4[^"]*)""#,
                r#"url":\s*"([^"]+\.mp4[^"]*)""#,
                r#""url":\s*"([^"]+\.mp4[^"]*)""#,
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            fallback: [
                r#""video_versions":\[\{[^\}]*"url":"([^"]+)""#,
                r#""url":"(https://[^"]+\.mp4[^"]*)""#,
                r#"url":"(https://[^"]+\.mp4[^"]*)""#,
                r#""url":\s*"([^"]+\.mp4[^"]*)""#,
                r#"url:\s*"([^"]+\.mp4[^"]*)""#,
                r#""contentUrl":"([^"]+\.mp4[^"]*)""#,
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            preloader: r#"PolarisPostRootQueryRelayPreloader_[^"]+",(\{"__bbox":\{"complete":true,"result":\{"data":\{"xdt_api__v1__media__shortcode__web_info":)"#
                .to_string(),
        }
    }
}

fn capture(name: &str, pattern: &str) -> LandmarkSpec {
    LandmarkSpec::Capture {
        name: name.into(),
        pattern: pattern.into(),
    }
}

/// Compiled landmark.
#[derive(Debug, Clone)]
pub enum Landmark {
    Capture { name: String, regex: Regex },
    BareJson { name: String, prefix: String },
}

impl Landmark {
    pub fn name(&self) -> &str {
        match self {
            Self::Capture { name, .. } | Self::BareJson { name, .. } => name,
        }
    }
}

/// Compiled heuristic tables.
#[derive(Debug, Clone)]
pub struct PatternTable {
    soft_404_phrases: Vec<String>,
    pub landmarks: Vec<Landmark>,
    pub primary: Vec<Regex>,
    pub fallback: Vec<Regex>,
    pub preloader: Regex,
}

static DEFAULT_TABLE: LazyLock<PatternTable> =
    LazyLock::new(|| PatternTable::compile(&PatternSpec::default()).unwrap());

impl Default for PatternTable {
    fn default() -> Self {
        DEFAULT_TABLE.clone()
    }
}

impl PatternTable {
    /// Compile a spec. Fails on the first invalid regex.
    pub fn compile(spec: &PatternSpec) -> Result<Self, regex::Error> {
        let landmarks = spec
            .landmarks
            .iter()
            .map(|l| match l {
                LandmarkSpec::Capture { name, pattern } => Ok(Landmark::Capture {
                    name: name.clone(),
                    regex: Regex::new(pattern)?,
                }),
                LandmarkSpec::BareJson { name, prefix } => Ok(Landmark::BareJson {
                    name: name.clone(),
                    prefix: prefix.clone(),
                }),
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        let primary = spec
            .primary
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let fallback = spec
            .fallback
            .iter()
            .map(|p| RegexBuilder::new(p).case_insensitive(true).build())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            soft_404_phrases: spec
                .soft_404_phrases
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
            landmarks,
            primary,
            fallback,
            preloader: Regex::new(&spec.preloader)?,
        })
    }

    /// Parse a JSON [`PatternSpec`] and compile it.
    pub fn from_json(json: &str) -> Result<Self, PatternLoadError> {
        let spec: PatternSpec = serde_json::from_str(json)?;
        Ok(Self::compile(&spec)?)
    }

    /// First soft-404 phrase found in `body`, compared case-insensitively.
    pub fn soft_404_match(&self, body: &str) -> Option<&str> {
        let lowered = body.to_lowercase();
        self.soft_404_phrases
            .iter()
            .find(|phrase| lowered.contains(phrase.as_str()))
            .map(String::as_str)
    }
}

/// Errors loading a replacement pattern table.
#[derive(Debug, thiserror::Error)]
pub enum PatternLoadError {
    #[error("invalid pattern spec JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid regex in pattern spec: {0}")]
    Regex(#[from] regex::Error),
}
