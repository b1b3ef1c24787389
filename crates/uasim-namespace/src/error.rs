use thiserror::Error;
use uasim_codec::CodecError;
use uasim_space::SpaceError;

/// Failure while building a namespace. Any of these aborts the build.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("address space: {0}")]
    Space(#[from] SpaceError),

    #[error("type registry: {0}")]
    Codec(#[from] CodecError),

    #[error("scalar {name}: {reason}")]
    InvalidScalar { name: String, reason: String },

    #[error("namespace index 0 is reserved for the core namespace")]
    ReservedNamespace,
}

pub type BuildResult<T> = Result<T, BuildError>;
