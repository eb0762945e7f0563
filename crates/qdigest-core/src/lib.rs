//! Core model and redaction engine for qdigest
//!
//! This crate contains:
//! - Document value model and classifier
//! - Redaction engine (recursive masking, root policy)
//! - Profiling record model and output rendering

pub mod error;
pub mod record;
pub mod redact;
pub mod render;
pub mod value;

pub use error::{Error, Result};
pub use record::ProfileRecord;
pub use redact::{
    KEY_PLACEHOLDER, OPERATOR_SENTINEL, RedactionPolicy, Redactor, VALUE_PLACEHOLDER,
    default_root_exclusions, redact_root,
};
pub use render::{RenderStyle, RenderedPair};
pub use value::{Document, Scalar, ScalarKind, Value, ValueKind, classify};
