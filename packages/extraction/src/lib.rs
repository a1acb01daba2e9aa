//! Video URL Extraction Library
//!
//! Resolves a mirrored short-form content URL (`/reel/{id}/`, `/p/{id}/`,
//! `/tv/{id}/`) to a directly playable video URL, without the caller ever
//! talking to the upstream platform itself.
//!
//! # Design Philosophy
//!
//! **Upstream pages are hostile input.**
//!
//! - Every strategy is an entry in an ordered list; first hit wins
//! - A miss is a value, not an error, until every strategy has missed
//! - JSON is navigated with non-panicking probes only
//! - Heuristic tables are data and can be swapped at runtime
//!
//! # Usage
//!
//! ```rust,ignore
//! use extraction::{Extractor, ExtractorConfig, HttpTransport};
//! use std::sync::Arc;
//!
//! let extractor = Extractor::new(Arc::new(HttpTransport::new()), ExtractorConfig::default());
//! let media = extractor.resolve("https://www.instagram.com/reel/ABC123/").await?;
//! assert_eq!(media.file_name, "ABC123.mp4");
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (Transport, PageSink)
//! - [`types`] - Shortcodes, pages, resolutions, configuration
//! - [`pipeline`] - Fetch, locate, resolve and enrich
//! - [`transports`] - Transport implementations (HttpTransport, MockTransport)
//! - [`sinks`] - Page sink implementations (FileSink, MemorySink)
//! - [`json`] - Non-panicking JSON navigation
//! - [`testing`] - Fixtures for testing

pub mod error;
pub mod json;
pub mod pipeline;
pub mod sinks;
pub mod testing;
pub mod traits;
pub mod transports;
pub mod types;

// Re-export core types at crate root
pub use error::{ErrorKind, ExtractionError, Result, TransportError};
pub use traits::{
    sink::PageSink,
    transport::{Transport, TransportRequest, TransportResponse},
};
pub use types::{
    config::ExtractorConfig,
    media::{MediaMetadata, MediaResolution},
    page::RawPage,
    shortcode::Shortcode,
};

// Re-export pipeline components
pub use pipeline::{Extractor, PatternLoadError, PatternSpec, PatternTable, UpstreamFetcher};

// Re-export implementations
pub use sinks::{FileSink, MemorySink};
pub use transports::{HttpTransport, MockTransport};
