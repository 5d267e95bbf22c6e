use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::Result;

/// Destination of "copy result". Hosts bridge this to the system clipboard.
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<()>;
}

/// Keeps the last copied text in memory, for headless hosts.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self { Self::default() }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        *self.contents.lock().unwrap_or_else(PoisonError::into_inner) = Some(text.to_string());
        Ok(())
    }
}
