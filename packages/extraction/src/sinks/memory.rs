//! In-memory page sink for tests.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::traits::sink::PageSink;
use crate::types::{page::RawPage, shortcode::Shortcode};

/// Collects saved pages. Clones share storage.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pages: Arc<RwLock<Vec<(Shortcode, RawPage)>>>,
    fail: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every save fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.pages.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pages(&self) -> Vec<(Shortcode, RawPage)> {
        self.pages.read().unwrap().clone()
    }
}

#[async_trait]
impl PageSink for MemorySink {
    async fn save(&self, shortcode: &Shortcode, page: &RawPage) -> std::io::Result<()> {
        if self.fail {
            return Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "memory sink configured to fail",
            ));
        }
        self.pages
            .write()
            .unwrap()
            .push((shortcode.clone(), page.clone()));
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
