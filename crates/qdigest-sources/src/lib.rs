pub mod file;
pub mod filter;
pub mod handler;
pub mod jsonl;
pub mod stdin;

pub use filter::NamespaceFilter;
pub use handler::{RecordSource, SourceHandler, SourceHandlerRegistry};
pub use jsonl::JsonLinesSource;
