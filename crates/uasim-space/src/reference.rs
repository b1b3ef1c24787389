use std::fmt;

use uasim_types::{ExpandedNodeId, NodeClass, NodeId};

/// A typed, directed edge stored on its source node.
///
/// A reference and its logical inverse are two independent stored edges:
/// adding one never creates the other.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Reference {
    pub reference_type: NodeId,
    pub target: ExpandedNodeId,
    pub target_class: NodeClass,
    pub is_forward: bool,
}

impl Reference {
    pub fn forward(reference_type: NodeId, target: NodeId, target_class: NodeClass) -> Self {
        Self {
            reference_type,
            target: target.into(),
            target_class,
            is_forward: true,
        }
    }

    pub fn inverse(reference_type: NodeId, target: NodeId, target_class: NodeClass) -> Self {
        Self {
            is_forward: false,
            ..Self::forward(reference_type, target, target_class)
        }
    }

    /// The target as a local node id, if it lives on this server.
    pub fn local_target(&self) -> Option<&NodeId> {
        self.target.local()
    }

    /// Returns `true` if `other`, stored on this reference's target, is its
    /// logical inverse pointing back at `source`.
    pub fn is_inverse_of(&self, source: &NodeId, other: &Reference) -> bool {
        other.reference_type == self.reference_type
            && other.is_forward != self.is_forward
            && other.local_target() == Some(source)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = if self.is_forward { "->" } else { "<-" };
        write!(
            f,
            "{arrow} {} {} ({:?})",
            self.reference_type, self.target, self.target_class
        )
    }
}

/// A stored edge whose logical inverse is missing on the target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Asymmetry {
    pub source: NodeId,
    pub reference: Reference,
}

impl fmt::Display for Asymmetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} has no inverse", self.source, self.reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uasim_types::ids;

    #[test]
    fn inverse_detection() {
        let a = NodeId::string(1, "a");
        let b = NodeId::string(1, "b");
        let fwd = Reference::forward(ids::ORGANIZES, b.clone(), NodeClass::Object);
        let inv = Reference::inverse(ids::ORGANIZES, a.clone(), NodeClass::Object);
        assert!(fwd.is_inverse_of(&a, &inv));
        assert!(!fwd.is_inverse_of(&b, &inv));

        let wrong_type = Reference::inverse(ids::HAS_COMPONENT, a.clone(), NodeClass::Object);
        assert!(!fwd.is_inverse_of(&a, &wrong_type));
    }

    #[test]
    fn remote_target_is_not_local() {
        let mut r = Reference::forward(ids::ORGANIZES, NodeId::numeric(0, 1), NodeClass::Object);
        assert!(r.local_target().is_some());
        r.target.namespace_uri = Some("urn:elsewhere".into());
        assert!(r.local_target().is_none());
    }
}
