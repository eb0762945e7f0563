use async_trait::async_trait;
use qdigest_core::{Error, Result};
use tokio::io::BufReader;

use crate::handler::{RecordSource, SourceHandler};
use crate::jsonl::JsonLinesSource;

pub struct FileHandler;

#[async_trait]
impl SourceHandler for FileHandler {
    async fn open(&self, uri: &str) -> Result<Box<dyn RecordSource>> {
        let path = uri.strip_prefix("file:").unwrap_or(uri);

        if path.is_empty() {
            return Err(Error::InvalidSourceUri(format!("Missing file path: {}", uri)));
        }

        let file = tokio::fs::File::open(path).await.map_err(|e| {
            Error::Other(anyhow::anyhow!("Failed to open profile dump {}: {}", path, e))
        })?;

        tracing::debug!(path, "opened profile dump");

        Ok(Box::new(JsonLinesSource::new(BufReader::new(file), path)))
    }

    fn can_handle(&self, uri: &str) -> bool {
        uri.starts_with("file:") || (!uri.contains(':') && uri != "-")
    }
}
