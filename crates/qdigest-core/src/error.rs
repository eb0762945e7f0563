use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid profile record: {0}")]
    InvalidRecord(String),

    #[error("Expected a document, found {0}")]
    NotADocument(&'static str),

    #[error("Invalid source URI: {0}")]
    InvalidSourceUri(String),

    #[error("Failed to parse record on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
