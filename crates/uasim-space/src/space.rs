//! The node store and its reference graph.
//!
//! [`AddressSpace`] owns every node, keyed by [`NodeId`]. It is mutated only
//! while namespaces are built; afterwards it is shared behind an `Arc` and
//! the only mutable state left is each Variable's stored value.
//!
//! # Invariants
//!
//! - Node ids are unique. A rejected insert leaves the store unchanged.
//! - References are stored per source node. The graph does not enforce
//!   symmetry; [`AddressSpace::link`] adds both directions and
//!   [`AddressSpace::asymmetric_references`] reports edges whose inverse is
//!   missing.

use std::collections::{HashMap, HashSet};

use tracing::debug;
use uasim_types::{ids, Identifier, LocalizedText, NodeId, QualifiedName};

use crate::error::{SpaceError, SpaceResult};
use crate::node::{Node, NodeHeader, NodeKind, ObjectNode, VariableTypeNode};
use crate::reference::{Asymmetry, Reference};

/// Reference types that are expected to be stored in both directions.
pub const SYMMETRIC_REFERENCE_TYPES: [NodeId; 4] = [
    ids::ORGANIZES,
    ids::HAS_COMPONENT,
    ids::HAS_PROPERTY,
    ids::HAS_SUBTYPE,
];

#[derive(Debug, Default)]
pub struct AddressSpace {
    nodes: HashMap<NodeId, Node>,
}

impl AddressSpace {
    /// Create an empty address space.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.nodes.contains_key(node_id)
    }

    pub fn get(&self, node_id: &NodeId) -> Option<&Node> {
        self.nodes.get(node_id)
    }

    pub fn get_mut(&mut self, node_id: &NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(node_id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    // ---------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------

    /// Insert a node. Fails without touching the store if the id is taken.
    pub fn add_node(&mut self, node: Node) -> SpaceResult<()> {
        if self.nodes.contains_key(node.node_id()) {
            return Err(SpaceError::DuplicateNodeId(node.node_id().clone()));
        }
        debug!(node = %node.node_id(), class = ?node.node_class(), "added node");
        self.nodes.insert(node.node_id().clone(), node);
        Ok(())
    }

    /// Append a reference to `source`. The target side is not touched.
    pub fn add_reference(&mut self, source: &NodeId, reference: Reference) -> SpaceResult<()> {
        let node = self
            .nodes
            .get_mut(source)
            .ok_or_else(|| SpaceError::NodeNotFound(source.clone()))?;
        node.references.push(reference);
        Ok(())
    }

    /// Add a forward `reference_type` edge from `source` to `target` and the
    /// matching inverse edge on `target`. Both nodes must exist.
    pub fn link(&mut self, source: &NodeId, reference_type: &NodeId, target: &NodeId) -> SpaceResult<()> {
        for id in [source, target] {
            if !self.nodes.contains_key(id) {
                return Err(SpaceError::NodeNotFound(id.clone()));
            }
        }
        self.connect(source, reference_type, target);
        Ok(())
    }

    /// Symmetric link between nodes already known to exist.
    fn connect(&mut self, source: &NodeId, reference_type: &NodeId, target: &NodeId) {
        let (Some(source_class), Some(target_class)) = (
            self.nodes.get(source).map(Node::node_class),
            self.nodes.get(target).map(Node::node_class),
        ) else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(source) {
            node.references
                .push(Reference::forward(reference_type.clone(), target.clone(), target_class));
        }
        if let Some(node) = self.nodes.get_mut(target) {
            node.references
                .push(Reference::inverse(reference_type.clone(), source.clone(), source_class));
        }
    }

    /// Remove every node in `namespace` and every reference that targets
    /// one. Used to roll back a namespace whose build failed.
    pub fn remove_namespace(&mut self, namespace: u16) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|id, _| id.namespace != namespace);
        for node in self.nodes.values_mut() {
            node.references
                .retain(|r| r.local_target().map_or(true, |t| t.namespace != namespace));
        }
        let removed = before - self.nodes.len();
        debug!(namespace, removed, "removed namespace");
        removed
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// All references stored on a node, unfiltered.
    pub fn browse(&self, node_id: &NodeId) -> SpaceResult<&[Reference]> {
        self.nodes
            .get(node_id)
            .map(|node| node.references.as_slice())
            .ok_or_else(|| SpaceError::NodeNotFound(node_id.clone()))
    }

    /// Every stored edge of the given type (or of any
    /// [`SYMMETRIC_REFERENCE_TYPES`] entry when `None`) whose local target
    /// does not hold the inverse edge. Sorted by source id.
    pub fn asymmetric_references(&self, reference_type: Option<&NodeId>) -> Vec<Asymmetry> {
        let wanted = |r: &Reference| match reference_type {
            Some(t) => r.reference_type == *t,
            None => SYMMETRIC_REFERENCE_TYPES.contains(&r.reference_type),
        };

        let mut found = Vec::new();
        for node in self.nodes.values() {
            for reference in node.references.iter().filter(|r| wanted(r)) {
                let Some(target) = reference.local_target().and_then(|t| self.nodes.get(t)) else {
                    continue;
                };
                let has_inverse = target
                    .references
                    .iter()
                    .any(|back| reference.is_inverse_of(node.node_id(), back));
                if !has_inverse {
                    found.push(Asymmetry {
                        source: node.node_id().clone(),
                        reference: reference.clone(),
                    });
                }
            }
        }
        found.sort_by(|a, b| a.source.cmp(&b.source));
        found
    }

    /// Direct supertype, following the inverse HasSubtype edge.
    pub fn supertype_of(&self, node_id: &NodeId) -> Option<&NodeId> {
        self.nodes
            .get(node_id)?
            .references
            .iter()
            .filter(|r| !r.is_forward && r.reference_type == ids::HAS_SUBTYPE)
            .find_map(Reference::local_target)
    }

    /// Returns `true` if `sub` is `sup` or one of its (transitive) subtypes.
    pub fn is_subtype_of(&self, sub: &NodeId, sup: &NodeId) -> bool {
        let mut seen = HashSet::new();
        let mut current = Some(sub);
        while let Some(id) = current {
            if id == sup {
                return true;
            }
            if !seen.insert(id) {
                return false;
            }
            current = self.supertype_of(id);
        }
        false
    }

    // ---------------------------------------------------------------
    // Object-type instantiation
    // ---------------------------------------------------------------

    /// Create an Object of `type_id` with a copy of every Variable the type
    /// declares through HasComponent. Copies are named
    /// `<object id>.<browse name>` and linked to the object both ways.
    pub fn instantiate_object(
        &mut self,
        type_id: &NodeId,
        object_id: NodeId,
        browse_name: QualifiedName,
        display_name: LocalizedText,
    ) -> SpaceResult<()> {
        let type_node = self
            .nodes
            .get(type_id)
            .ok_or_else(|| SpaceError::NodeNotFound(type_id.clone()))?;
        if !matches!(type_node.kind, NodeKind::ObjectType(_)) {
            return Err(SpaceError::NotAnObjectType(type_id.clone()));
        }

        let prefix = match &object_id.identifier {
            Identifier::String(s) => s.clone(),
            other => other.to_string(),
        };

        let mut members = Vec::new();
        for reference in type_node.forward_references(&ids::HAS_COMPONENT) {
            let Some(decl) = reference.local_target().and_then(|t| self.nodes.get(t)) else {
                continue;
            };
            let Some(var) = decl.as_variable() else {
                continue;
            };
            let member_id = NodeId::string(
                object_id.namespace,
                format!("{prefix}.{}", decl.browse_name().name),
            );
            let header = NodeHeader {
                node_id: member_id,
                ..decl.header.clone()
            };
            members.push(Node::new(
                header,
                NodeKind::Variable(var.variable.instance_copy()),
            ));
        }

        // Check every id before inserting anything.
        let mut pending = HashSet::new();
        for id in std::iter::once(&object_id).chain(members.iter().map(Node::node_id)) {
            if self.nodes.contains_key(id) || !pending.insert(id.clone()) {
                return Err(SpaceError::DuplicateNodeId(id.clone()));
            }
        }

        let object = Node::new(
            NodeHeader::new(object_id.clone(), browse_name, display_name),
            NodeKind::Object(ObjectNode {
                type_definition: type_id.clone(),
            }),
        );
        self.add_node(object)?;
        for member in members {
            let member_id = member.node_id().clone();
            self.add_node(member)?;
            self.connect(&object_id, &ids::HAS_COMPONENT, &member_id);
        }

        debug!(object = %object_id, object_type = %type_id, "instantiated object");
        Ok(())
    }

    // ---------------------------------------------------------------
    // Namespace 0
    // ---------------------------------------------------------------

    /// An address space seeded with the namespace-0 folders, base types and
    /// built-in data types, all linked symmetrically.
    pub fn with_core_nodes() -> Self {
        let mut space = Self::new();

        let folders = [
            (ids::ROOT_FOLDER, "Root"),
            (ids::OBJECTS_FOLDER, "Objects"),
            (ids::TYPES_FOLDER, "Types"),
        ];
        for (id, name) in folders {
            space.seed(Node::folder(id, name));
        }
        space.connect(&ids::ROOT_FOLDER, &ids::ORGANIZES, &ids::OBJECTS_FOLDER);
        space.connect(&ids::ROOT_FOLDER, &ids::ORGANIZES, &ids::TYPES_FOLDER);

        space.seed(Node::object_type(ids::BASE_OBJECT_TYPE, "BaseObjectType", false));
        space.seed(Node::object_type(ids::FOLDER_TYPE, "FolderType", false));
        space.seed(Node::object_type(ids::DATA_TYPE_ENCODING_TYPE, "DataTypeEncodingType", false));
        space.connect(&ids::BASE_OBJECT_TYPE, &ids::HAS_SUBTYPE, &ids::FOLDER_TYPE);
        space.connect(&ids::BASE_OBJECT_TYPE, &ids::HAS_SUBTYPE, &ids::DATA_TYPE_ENCODING_TYPE);

        space.seed(Node::new(
            NodeHeader::named(ids::BASE_DATA_VARIABLE_TYPE, "BaseDataVariableType"),
            NodeKind::VariableType(VariableTypeNode {
                is_abstract: false,
                data_type: ids::BASE_DATA_TYPE,
            }),
        ));

        // (id, name, abstract, supertype)
        let data_types = [
            (ids::BASE_DATA_TYPE, "BaseDataType", true, None),
            (ids::STRUCTURE, "Structure", true, Some(ids::BASE_DATA_TYPE)),
            (ids::NUMBER, "Number", true, Some(ids::BASE_DATA_TYPE)),
            (ids::INTEGER, "Integer", true, Some(ids::NUMBER)),
            (ids::UINTEGER, "UInteger", true, Some(ids::NUMBER)),
            (ids::BOOLEAN, "Boolean", false, Some(ids::BASE_DATA_TYPE)),
            (ids::SBYTE, "SByte", false, Some(ids::INTEGER)),
            (ids::INT16, "Int16", false, Some(ids::INTEGER)),
            (ids::INT32, "Int32", false, Some(ids::INTEGER)),
            (ids::INT64, "Int64", false, Some(ids::INTEGER)),
            (ids::BYTE, "Byte", false, Some(ids::UINTEGER)),
            (ids::UINT16, "UInt16", false, Some(ids::UINTEGER)),
            (ids::UINT32, "UInt32", false, Some(ids::UINTEGER)),
            (ids::UINT64, "UInt64", false, Some(ids::UINTEGER)),
            (ids::FLOAT, "Float", false, Some(ids::NUMBER)),
            (ids::DOUBLE, "Double", false, Some(ids::NUMBER)),
            (ids::STRING, "String", false, Some(ids::BASE_DATA_TYPE)),
            (ids::DATE_TIME, "DateTime", false, Some(ids::BASE_DATA_TYPE)),
            (ids::GUID, "Guid", false, Some(ids::BASE_DATA_TYPE)),
            (ids::BYTE_STRING, "ByteString", false, Some(ids::BASE_DATA_TYPE)),
            (ids::XML_ELEMENT, "XmlElement", false, Some(ids::BASE_DATA_TYPE)),
            (ids::NODE_ID, "NodeId", false, Some(ids::BASE_DATA_TYPE)),
            (ids::QUALIFIED_NAME, "QualifiedName", false, Some(ids::BASE_DATA_TYPE)),
            (ids::LOCALIZED_TEXT, "LocalizedText", false, Some(ids::BASE_DATA_TYPE)),
            (ids::DURATION, "Duration", false, Some(ids::DOUBLE)),
            (ids::UTC_TIME, "UtcTime", false, Some(ids::DATE_TIME)),
        ];
        for (id, name, is_abstract, supertype) in data_types {
            space.seed(Node::data_type(id.clone(), name, is_abstract));
            if let Some(supertype) = supertype {
                space.connect(&supertype, &ids::HAS_SUBTYPE, &id);
            }
        }

        debug!(nodes = space.len(), "seeded core namespace");
        space
    }

    fn seed(&mut self, node: Node) {
        self.nodes.insert(node.node_id().clone(), node);
    }
}
