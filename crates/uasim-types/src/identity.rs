use std::fmt;

use serde::{Deserialize, Serialize};

/// The already-authenticated identity a request is made under.
///
/// Identities are opaque to the address space; they are only consulted by
/// access policies when deciding what a caller may read or write.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Identity {
    #[default]
    Anonymous,
    User(String),
}

impl Identity {
    pub fn user(name: impl Into<String>) -> Self {
        Self::User(name.into())
    }

    /// The user name, or `None` for anonymous callers.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::User(name) => Some(name),
        }
    }

    /// Returns `true` if this is the named user.
    pub fn is(&self, name: &str) -> bool {
        self.name() == Some(name)
    }
}

impl From<&str> for Identity {
    fn from(name: &str) -> Self {
        if name.is_empty() || name == "anonymous" {
            Self::Anonymous
        } else {
            Self::user(name)
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => write!(f, "anonymous"),
            Self::User(name) => write!(f, "{name}"),
        }
    }
}
