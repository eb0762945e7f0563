//! Profiling record model

use crate::value::{Document, Value};
use crate::{Error, Result};

/// One entry of a database's `system.profile` collection
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileRecord {
    /// Operation type (`query`, `update`, `command`, ...)
    pub op: String,
    /// Target namespace, `<database>.<collection>`
    pub ns: String,
    /// Command body as sent by the client
    pub command: Document,
    /// Execution time in milliseconds, if recorded
    pub millis: Option<i64>,
}

impl ProfileRecord {
    /// Build a record from a profile document. Absent fields default to empty.
    pub fn from_document(doc: Document) -> Result<Self> {
        let op = string_field(&doc, "op")?;
        let ns = string_field(&doc, "ns")?;
        let millis = doc.get("millis").and_then(Value::as_i64);

        let command = match doc.into_iter().find(|(key, _)| key == "command") {
            None | Some((_, Value::Null)) => Document::new(),
            Some((_, Value::Document(command))) => command,
            Some((_, other)) => {
                return Err(Error::InvalidRecord(format!(
                    "command must be a document, found {}",
                    other.type_tag()
                )));
            }
        };

        Ok(Self {
            op,
            ns,
            command,
            millis,
        })
    }

    /// Parse one Extended JSON profile document
    pub fn from_json_str(text: &str) -> Result<Self> {
        Self::from_document(Document::from_json_str(text)?)
    }
}

fn string_field(doc: &Document, key: &str) -> Result<String> {
    match doc.get(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(value) => value.as_str().map(str::to_string).ok_or_else(|| {
            Error::InvalidRecord(format!(
                "{} must be a string, found {}",
                key,
                value.type_tag()
            ))
        }),
    }
}
