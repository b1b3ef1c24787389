use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid node id: {0}")]
    InvalidNodeId(String),

    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("unknown attribute id: {0}")]
    UnknownAttribute(u32),

    #[error("cannot parse {text:?} as {data_type}")]
    InvalidValue { text: String, data_type: String },

    #[error("data type {0} has no textual form")]
    UnsupportedDataType(String),
}
