// HTTP middleware
pub mod ip_extractor;
pub mod request_logging;

pub use ip_extractor::*;
pub use request_logging::*;
