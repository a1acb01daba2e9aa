//! Writes accepted pages to disk for offline inspection.

use async_trait::async_trait;
use chrono::Utc;
use std::path::PathBuf;
use tracing::debug;

use crate::traits::sink::PageSink;
use crate::types::{page::RawPage, shortcode::Shortcode};

/// Saves each page as `{dir}/debug-{shortcode}-{unix}.html`.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, shortcode: &Shortcode) -> PathBuf {
        self.dir
            .join(format!("debug-{}-{}.html", shortcode, Utc::now().timestamp()))
    }
}

#[async_trait]
impl PageSink for FileSink {
    async fn save(&self, shortcode: &Shortcode, page: &RawPage) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(shortcode);
        tokio::fs::write(&path, page.body.as_bytes()).await?;
        debug!(path = %path.display(), bytes = page.body.len(), "Saved page body");
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}
