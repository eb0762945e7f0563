//! Record source traits and registry

use async_trait::async_trait;
use qdigest_core::{Error, ProfileRecord, Result};

use crate::file::FileHandler;
use crate::stdin::StdinHandler;

/// A stream of profiling records, read one at a time
#[async_trait]
pub trait RecordSource: Send {
    /// Next fully-materialized record, or `None` once the source is drained
    async fn next_record(&mut self) -> Result<Option<ProfileRecord>>;

    /// Short label for log output
    fn describe(&self) -> String;
}

/// Trait for opening the different source types
#[async_trait]
pub trait SourceHandler: Send + Sync {
    /// Open the source named by `uri`
    async fn open(&self, uri: &str) -> Result<Box<dyn RecordSource>>;

    /// Check if this handler can handle the given URI
    fn can_handle(&self, uri: &str) -> bool;
}

/// Resolves source URIs (`file:path`, bare paths, `-`, `stdin:`) to record sources
pub struct SourceHandlerRegistry {
    handlers: Vec<Box<dyn SourceHandler>>,
}

impl SourceHandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: vec![Box::new(StdinHandler), Box::new(FileHandler)],
        }
    }

    pub async fn open(&self, uri: &str) -> Result<Box<dyn RecordSource>> {
        let handler = self
            .handlers
            .iter()
            .find(|h| h.can_handle(uri))
            .ok_or_else(|| Error::InvalidSourceUri(format!("No handler for source: {}", uri)))?;

        handler.open(uri).await
    }
}

impl Default for SourceHandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
