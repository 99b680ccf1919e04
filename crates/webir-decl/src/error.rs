use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeclError {
    #[error("unterminated {what} starting at byte {offset}")]
    Unterminated { what: &'static str, offset: usize },

    #[error("expected {expected} at byte {offset}, found `{found}`")]
    Unexpected {
        expected: &'static str,
        found: String,
        offset: usize,
    },

    #[error("unexpected end of input inside interface `{interface}`")]
    UnexpectedEof { interface: String },

    #[error("failed to read declarations from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
