// Reel relay - API Core
//
// Mirrors the upstream platform's content URLs, resolves them to a video URL
// through the extraction library, and streams the video back to the client.

pub mod config;
pub mod server;

pub use config::*;
