//! Core trait abstractions for the extraction library.
//!
//! Applications implement these to supply network access and, optionally,
//! somewhere to keep page bodies for inspection.

pub mod sink;
pub mod transport;
