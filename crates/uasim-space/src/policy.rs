use uasim_types::{AccessLevel, Identity};

use crate::variable::VariableRef;

/// Which side of a Value access is being evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessOperation {
    Read,
    Write,
}

impl AccessOperation {
    /// The access bit this operation requires.
    pub fn required(&self) -> AccessLevel {
        match self {
            Self::Read => AccessLevel::CURRENT_READ,
            Self::Write => AccessLevel::CURRENT_WRITE,
        }
    }
}

/// Identity-dependent access level for a Variable.
///
/// Evaluated on every attribute operation. Implementations must be pure:
/// the same inputs always yield the same level.
pub trait AccessPolicy: Send + Sync {
    fn evaluate(
        &self,
        identity: &Identity,
        target: VariableRef<'_>,
        operation: AccessOperation,
    ) -> AccessLevel;
}
