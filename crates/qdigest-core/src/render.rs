//! Text rendering of original/redacted command pairs

use std::fmt;

use serde::Serialize;

use crate::Result;
use crate::record::ProfileRecord;
use crate::value::Document;

/// Output layout for rendered documents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderStyle {
    #[default]
    Compact,
    Pretty,
}

impl RenderStyle {
    pub fn render<T: Serialize>(self, value: &T) -> Result<String> {
        let text = match self {
            RenderStyle::Compact => serde_json::to_string(value)?,
            RenderStyle::Pretty => serde_json::to_string_pretty(value)?,
        };
        Ok(text)
    }
}

/// A processed record, ready to print
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPair {
    pub op: String,
    pub original: String,
    pub redacted: String,
}

impl RenderedPair {
    pub fn new(record: &ProfileRecord, redacted: &Document, style: RenderStyle) -> Result<Self> {
        Ok(Self {
            op: record.op.clone(),
            original: style.render(&record.command)?,
            redacted: style.render(redacted)?,
        })
    }
}

impl fmt::Display for RenderedPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "original: {}", self.original)?;
        write!(f, "redacted {}: {}", self.op, self.redacted)
    }
}
