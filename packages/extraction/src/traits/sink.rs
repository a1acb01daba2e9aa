//! Debug sink for accepted page bodies.

use async_trait::async_trait;

use crate::types::{page::RawPage, shortcode::Shortcode};

/// Receives every page body the fetcher accepts, when debugging is enabled.
///
/// Failures are reported back but never abort a resolve.
#[async_trait]
pub trait PageSink: Send + Sync {
    async fn save(&self, shortcode: &Shortcode, page: &RawPage) -> std::io::Result<()>;

    fn name(&self) -> &str {
        "unknown"
    }
}
