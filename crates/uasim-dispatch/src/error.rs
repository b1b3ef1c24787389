use uasim_codec::CodecError;
use uasim_space::{AccessOperation, DelegateError};
use uasim_types::{Identity, NodeId, StatusCode};

/// Per-item failure of a read, write, or call.
///
/// These never abort a batch: the dispatcher converts each one into the
/// status code of its item via [`AttributeError::status_code`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttributeError {
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// The caller's effective access level lacks the required bit.
    #[error("{identity} may not {operation:?} {node_id}")]
    AccessDenied {
        node_id: NodeId,
        identity: Identity,
        operation: AccessOperation,
    },

    #[error("attribute {attribute} is not supported by {node_id}")]
    AttributeUnsupported { node_id: NodeId, attribute: u32 },

    /// A write failed validation for a reason other than permissions.
    #[error("write rejected ({status}): {reason}")]
    WriteRejected { status: StatusCode, reason: String },

    /// A read or call was malformed.
    #[error("invalid request ({status}): {reason}")]
    InvalidRequest { status: StatusCode, reason: String },

    #[error("no codec registered for encoding id {0}")]
    UnknownEncodingId(NodeId),

    #[error("codec error: {0}")]
    Codec(CodecError),

    #[error(transparent)]
    Delegate(#[from] DelegateError),
}

impl AttributeError {
    pub fn rejected(status: StatusCode, reason: impl Into<String>) -> Self {
        Self::WriteRejected {
            status,
            reason: reason.into(),
        }
    }

    pub fn invalid(status: StatusCode, reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            status,
            reason: reason.into(),
        }
    }

    /// Status code reported for the failed item.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NodeNotFound(_) => StatusCode::BAD_NODE_ID_UNKNOWN,
            Self::AccessDenied { .. } => StatusCode::BAD_USER_ACCESS_DENIED,
            Self::AttributeUnsupported { .. } => StatusCode::BAD_ATTRIBUTE_ID_INVALID,
            Self::WriteRejected { status, .. } | Self::InvalidRequest { status, .. } => *status,
            Self::UnknownEncodingId(_) | Self::Codec(_) => StatusCode::BAD_DECODING_ERROR,
            Self::Delegate(e) => e.status,
        }
    }
}

impl From<CodecError> for AttributeError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::UnknownEncodingId(id) => Self::UnknownEncodingId(id),
            other => Self::Codec(other),
        }
    }
}

pub type AttributeResult<T> = Result<T, AttributeError>;
