//! Extraction pipeline - the core of the library.
//!
//! The pipeline orchestrates:
//! - Fetch (ordered candidates, soft-404 detection)
//! - Locate (landmark scan for embedded JSON)
//! - Resolve (structured shapes, then raw-text patterns)
//! - Enrich (author, caption, thumbnail)

pub mod extractor;
pub mod fetch;
pub mod locate;
pub mod metadata;
pub mod patterns;
pub mod raw;
pub mod shapes;
pub mod unescape;

pub use extractor::Extractor;
pub use fetch::{candidates, ClientIdentity, FetchCandidate, UpstreamFetcher};
pub use locate::locate;
pub use metadata::enrich;
pub use patterns::{LandmarkSpec, PatternLoadError, PatternSpec, PatternTable};
pub use raw::{resolve_raw, RawOutcome};
pub use shapes::{resolve_structured, Shape, SHAPES};
pub use unescape::{clean_candidate, unescape};
