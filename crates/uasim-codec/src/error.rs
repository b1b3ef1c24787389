use thiserror::Error;
use uasim_types::NodeId;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("encoding id already registered: {0}")]
    DuplicateEncodingId(NodeId),

    #[error("no structured type registered for encoding id {0}")]
    UnknownEncodingId(NodeId),

    #[error("truncated input: need {needed} bytes, have {remaining}")]
    Truncated { needed: usize, remaining: usize },

    #[error("invalid UTF-8 in string field")]
    InvalidUtf8,

    #[error("invalid length prefix: {0}")]
    InvalidLength(i32),

    #[error("{0} trailing bytes after last field")]
    TrailingBytes(usize),

    #[error("field {index} ({name}): expected {expected}, got {actual}")]
    FieldMismatch {
        index: usize,
        name: String,
        expected: String,
        actual: String,
    },

    #[error("expected {expected} fields, got {actual}")]
    FieldCount { expected: usize, actual: usize },

    #[error("value out of range: {0}")]
    OutOfRange(String),
}

pub type CodecResult<T> = Result<T, CodecError>;
