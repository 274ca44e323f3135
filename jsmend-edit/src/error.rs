//! Error types for jsmend-edit.
//!
//! Every variant is scoped to one file: the caller records it against that
//! file and carries on with the batch.

use jsmend_syntax::{ParseError, PrintError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepairError {
    /// The file could not be parsed; nothing is written.
    #[error("parse error at {0}")]
    Parse(#[from] ParseError),

    /// Two edits claimed the same source range.
    #[error("print error: {0}")]
    Print(#[from] PrintError),

    #[error("unsupported file type: {path}")]
    UnsupportedFile { path: String },
}

impl RepairError {
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, RepairError::Parse(_) | RepairError::UnsupportedFile { .. })
    }
}
