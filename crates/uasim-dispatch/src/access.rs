//! Access evaluation for Variable values.
//!
//! The effective level for a caller is the node's static AccessLevel
//! intersected with either its attached [`AccessPolicy`] or, without one,
//! its static UserAccessLevel. It is recomputed on every operation.

use std::collections::HashSet;

use tracing::warn;
use uasim_space::{AccessOperation, AccessPolicy, VariableRef};
use uasim_types::{AccessLevel, Identity, StatusCode};

use crate::error::{AttributeError, AttributeResult};

/// The caller's effective access level on `target`.
pub fn effective_level(identity: &Identity, target: VariableRef<'_>, operation: AccessOperation) -> AccessLevel {
    let user_level = match target.variable.policy() {
        Some(policy) => policy.evaluate(identity, target, operation),
        None => target.variable.user_access_level,
    };
    target.variable.access_level & user_level
}

/// Fail unless the caller may perform `operation` on `target`.
///
/// A node that does not support the operation at all reports
/// `BadNotReadable` / `BadNotWritable`; a caller who lacks permission on a
/// node that does reports `AccessDenied`.
pub fn check(identity: &Identity, target: VariableRef<'_>, operation: AccessOperation) -> AttributeResult<()> {
    let required = operation.required();
    if !target.variable.access_level.contains(required) {
        return Err(match operation {
            AccessOperation::Read => AttributeError::invalid(
                StatusCode::BAD_NOT_READABLE,
                format!("{} is not readable", target.node_id()),
            ),
            AccessOperation::Write => AttributeError::rejected(
                StatusCode::BAD_NOT_WRITABLE,
                format!("{} is not writable", target.node_id()),
            ),
        });
    }

    if !effective_level(identity, target, operation).contains(required) {
        warn!(
            node = %target.node_id(),
            identity = %identity,
            operation = ?operation,
            "access denied"
        );
        return Err(AttributeError::AccessDenied {
            node_id: target.node_id().clone(),
            identity: identity.clone(),
            operation,
        });
    }
    Ok(())
}

/// Grants one level to a named set of users and another to everyone else.
#[derive(Clone, Debug)]
pub struct IdentityAccessPolicy {
    privileged: HashSet<String>,
    granted: AccessLevel,
    otherwise: AccessLevel,
}

impl IdentityAccessPolicy {
    pub fn new(granted: AccessLevel, otherwise: AccessLevel) -> Self {
        Self {
            privileged: HashSet::new(),
            granted,
            otherwise,
        }
    }

    /// Add a user to the privileged set.
    pub fn allow(mut self, user: impl Into<String>) -> Self {
        self.privileged.insert(user.into());
        self
    }
}

impl AccessPolicy for IdentityAccessPolicy {
    fn evaluate(&self, identity: &Identity, _target: VariableRef<'_>, _operation: AccessOperation) -> AccessLevel {
        match identity.name() {
            Some(name) if self.privileged.contains(name) => self.granted,
            _ => self.otherwise,
        }
    }
}
