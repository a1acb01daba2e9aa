//! Data types for the extraction library.

pub mod config;
pub mod media;
pub mod page;
pub mod shortcode;
