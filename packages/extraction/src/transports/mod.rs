//! Transport implementations.
//!
//! # Available Transports
//!
//! - `HttpTransport` - reqwest client with per-request timeouts
//! - `MockTransport` - Scripted responses for testing

mod http;
mod mock;

pub use http::HttpTransport;
pub use mock::{MockReply, MockTransport};

// Re-export from traits for convenience
pub use crate::traits::transport::{Transport, TransportRequest, TransportResponse};
