use thiserror::Error;

use crate::diagnostics::SchemaViolation;

/// Terminal failures of a webir invocation.
#[derive(Debug, Error)]
pub enum WebirError {
    #[error("unsupported binding language: {name}")]
    UnsupportedTarget { name: String },

    #[error("failed to parse IR from {origin}: {source}")]
    MalformedInput {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("IR failed schema validation with {} violation(s)", .0.len())]
    SchemaViolations(Vec<SchemaViolation>),

    #[error("no input available: pass a file, use --in <path>, or pipe JSON on stdin")]
    MissingInput,
}
