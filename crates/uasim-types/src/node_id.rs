use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TypeError;

/// The identifier part of a [`NodeId`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Identifier {
    Numeric(u32),
    String(String),
    Guid(Uuid),
    Opaque(Vec<u8>),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "i={n}"),
            Self::String(s) => write!(f, "s={s}"),
            Self::Guid(g) => write!(f, "g={g}"),
            Self::Opaque(b) => write!(f, "b={}", hex::encode(b)),
        }
    }
}

/// Address of a node: a namespace index plus an identifier.
///
/// NodeIds are unique within an address space and never change once the
/// node they name has been created. The text form follows the usual
/// `ns=<index>;<kind>=<value>` notation, with `ns=0;` omitted.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    pub namespace: u16,
    pub identifier: Identifier,
}

impl NodeId {
    /// A numeric node id.
    pub const fn numeric(namespace: u16, value: u32) -> Self {
        Self {
            namespace,
            identifier: Identifier::Numeric(value),
        }
    }

    /// A string node id.
    pub fn string(namespace: u16, value: impl Into<String>) -> Self {
        Self {
            namespace,
            identifier: Identifier::String(value.into()),
        }
    }

    /// A GUID node id.
    pub fn guid(namespace: u16, value: Uuid) -> Self {
        Self {
            namespace,
            identifier: Identifier::Guid(value),
        }
    }

    /// An opaque (byte string) node id.
    pub fn opaque(namespace: u16, value: impl Into<Vec<u8>>) -> Self {
        Self {
            namespace,
            identifier: Identifier::Opaque(value.into()),
        }
    }

    /// The string identifier, if this is a string node id.
    pub fn as_str(&self) -> Option<&str> {
        match &self.identifier {
            Identifier::String(s) => Some(s),
            _ => None,
        }
    }

    /// The numeric identifier, if this is a numeric node id.
    pub fn as_numeric(&self) -> Option<u32> {
        match self.identifier {
            Identifier::Numeric(n) => Some(n),
            _ => None,
        }
    }

    /// Wrap this id as a local [`ExpandedNodeId`].
    pub fn expanded(&self) -> ExpandedNodeId {
        ExpandedNodeId::from(self.clone())
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({self})")
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace == 0 {
            write!(f, "{}", self.identifier)
        } else {
            write!(f, "ns={};{}", self.namespace, self.identifier)
        }
    }
}

impl FromStr for NodeId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TypeError::InvalidNodeId(s.to_string());

        let (namespace, rest) = match s.strip_prefix("ns=") {
            Some(tail) => {
                let (ns, rest) = tail.split_once(';').ok_or_else(invalid)?;
                (ns.parse::<u16>().map_err(|_| invalid())?, rest)
            }
            None => (0, s),
        };

        let (kind, value) = rest.split_once('=').ok_or_else(invalid)?;
        let identifier = match kind {
            "i" => Identifier::Numeric(value.parse().map_err(|_| invalid())?),
            "s" => Identifier::String(value.to_string()),
            "g" => Identifier::Guid(Uuid::parse_str(value).map_err(|_| invalid())?),
            "b" => Identifier::Opaque(
                hex::decode(value).map_err(|e| TypeError::InvalidHex(e.to_string()))?,
            ),
            _ => return Err(invalid()),
        };

        Ok(Self {
            namespace,
            identifier,
        })
    }
}

/// A node id that may live in another namespace (by URI) or on another
/// server. Used as the target of references.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpandedNodeId {
    pub node_id: NodeId,
    pub namespace_uri: Option<String>,
    pub server_index: u32,
}

impl ExpandedNodeId {
    /// The plain node id when the target is resolvable in the local server
    /// by index alone.
    pub fn local(&self) -> Option<&NodeId> {
        if self.namespace_uri.is_none() && self.server_index == 0 {
            Some(&self.node_id)
        } else {
            None
        }
    }
}

impl From<NodeId> for ExpandedNodeId {
    fn from(node_id: NodeId) -> Self {
        Self {
            node_id,
            namespace_uri: None,
            server_index: 0,
        }
    }
}

impl fmt::Display for ExpandedNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.server_index != 0 {
            write!(f, "svr={};", self.server_index)?;
        }
        match &self.namespace_uri {
            Some(uri) => write!(f, "nsu={uri};{}", self.node_id.identifier),
            None => write!(f, "{}", self.node_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn display_omits_namespace_zero() {
        assert_eq!(NodeId::numeric(0, 85).to_string(), "i=85");
        assert_eq!(NodeId::string(2, "Simulation").to_string(), "ns=2;s=Simulation");
    }

    #[test]
    fn parse_string_with_separators() {
        let id: NodeId = "ns=3;s=Simulation/ScalarNodes/Int32".parse().unwrap();
        assert_eq!(id.namespace, 3);
        assert_eq!(id.as_str(), Some("Simulation/ScalarNodes/Int32"));
    }

    #[test]
    fn parse_string_containing_equals() {
        let id: NodeId = "ns=1;s=a=b".parse().unwrap();
        assert_eq!(id.as_str(), Some("a=b"));
    }

    #[test]
    fn parse_opaque_and_guid() {
        let id: NodeId = "ns=1;b=0a0b".parse().unwrap();
        assert_eq!(id.identifier, Identifier::Opaque(vec![0x0a, 0x0b]));

        let guid = Uuid::new_v4();
        let id: NodeId = format!("g={guid}").parse().unwrap();
        assert_eq!(id, NodeId::guid(0, guid));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<NodeId>().is_err());
        assert!("ns=x;i=1".parse::<NodeId>().is_err());
        assert!("ns=1;q=1".parse::<NodeId>().is_err());
        assert!("ns=1;i=abc".parse::<NodeId>().is_err());
        assert!("ns=1".parse::<NodeId>().is_err());
    }

    #[test]
    fn expanded_local_resolution() {
        let id = NodeId::numeric(0, 85);
        assert_eq!(id.expanded().local(), Some(&id));

        let remote = ExpandedNodeId {
            node_id: id,
            namespace_uri: Some("urn:other".into()),
            server_index: 0,
        };
        assert!(remote.local().is_none());
    }

    #[test]
    fn serde_roundtrip() {
        let id = NodeId::string(2, "DataType.CustomDataType");
        let json = serde_json::to_string(&id).unwrap();
        let parsed: NodeId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    proptest! {
        #[test]
        fn text_form_roundtrips(ns in 0u16..1000, value in any::<u32>(), s in "[A-Za-z0-9/._()]{1,32}") {
            let numeric = NodeId::numeric(ns, value);
            prop_assert_eq!(numeric.to_string().parse::<NodeId>().unwrap(), numeric);

            let string = NodeId::string(ns, s);
            prop_assert_eq!(string.to_string().parse::<NodeId>().unwrap(), string);
        }
    }
}
