use serde::Serialize;
use uasim_types::ids;

use crate::error::{ServerError, ServerResult};

/// Namespace URIs by index. Index 0 is always the core namespace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NamespaceTable {
    uris: Vec<String>,
}

impl Default for NamespaceTable {
    fn default() -> Self {
        Self {
            uris: vec![ids::CORE_NAMESPACE_URI.to_string()],
        }
    }
}

impl NamespaceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.uris.len()
    }

    /// Always false: the core namespace is never removed.
    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }

    /// Append `uri` and return its index.
    pub fn register(&mut self, uri: &str) -> ServerResult<u16> {
        if self.index_of(uri).is_some() {
            return Err(ServerError::DuplicateNamespace(uri.to_string()));
        }
        let index = u16::try_from(self.uris.len()).map_err(|_| ServerError::NamespaceTableFull)?;
        self.uris.push(uri.to_string());
        Ok(index)
    }

    /// Drop the most recently registered namespace, as long as it is not the
    /// core one. Used to roll back a failed registration.
    pub(crate) fn pop(&mut self) -> Option<String> {
        if self.uris.len() > 1 {
            self.uris.pop()
        } else {
            None
        }
    }

    pub fn index_of(&self, uri: &str) -> Option<u16> {
        self.uris
            .iter()
            .position(|u| u == uri)
            .and_then(|i| u16::try_from(i).ok())
    }

    pub fn uri(&self, index: u16) -> Option<&str> {
        self.uris.get(usize::from(index)).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, &str)> {
        (0u16..).zip(self.uris.iter().map(String::as_str))
    }
}
