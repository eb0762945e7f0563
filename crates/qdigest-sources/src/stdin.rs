use async_trait::async_trait;
use qdigest_core::Result;
use tokio::io::BufReader;

use crate::handler::{RecordSource, SourceHandler};
use crate::jsonl::JsonLinesSource;

/// Reads records piped in on standard input (`-` or `stdin:`)
pub struct StdinHandler;

#[async_trait]
impl SourceHandler for StdinHandler {
    async fn open(&self, _uri: &str) -> Result<Box<dyn RecordSource>> {
        Ok(Box::new(JsonLinesSource::new(
            BufReader::new(tokio::io::stdin()),
            "<stdin>",
        )))
    }

    fn can_handle(&self, uri: &str) -> bool {
        uri == "-" || uri == "stdin:"
    }
}
