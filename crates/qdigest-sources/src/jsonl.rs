//! Newline-delimited Extended JSON, as written by exporting `system.profile`

use async_trait::async_trait;
use qdigest_core::{Error, ProfileRecord, Result, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::handler::RecordSource;

pub struct JsonLinesSource<R> {
    lines: Lines<R>,
    line: usize,
    label: String,
}

impl<R: AsyncBufRead + Unpin + Send> JsonLinesSource<R> {
    pub fn new(reader: R, label: impl Into<String>) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
            label: label.into(),
        }
    }

    fn parse_line(&self, text: &str) -> Result<ProfileRecord> {
        let value: Value = serde_json::from_str(text).map_err(|source| Error::Parse {
            line: self.line,
            source,
        })?;

        let kind = value.type_tag();
        let doc = value.into_document().ok_or_else(|| {
            Error::InvalidRecord(format!(
                "line {}: expected a document, found {}",
                self.line, kind
            ))
        })?;

        ProfileRecord::from_document(doc)
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> RecordSource for JsonLinesSource<R> {
    async fn next_record(&mut self) -> Result<Option<ProfileRecord>> {
        while let Some(text) = self
            .lines
            .next_line()
            .await
            .map_err(|source| Error::Read {
                line: self.line + 1,
                source,
            })?
        {
            self.line += 1;

            let text = text.trim();
            if text.is_empty() {
                continue;
            }

            return self.parse_line(text).map(Some);
        }

        Ok(None)
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}
