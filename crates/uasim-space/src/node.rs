//! Node model: a common header plus a per-class payload.

use uasim_types::{ids, LocalizedText, NodeClass, NodeId, QualifiedName};

use crate::method::MethodNode;
use crate::reference::Reference;
use crate::variable::{VariableNode, VariableRef};

/// Attributes shared by every node class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeHeader {
    pub node_id: NodeId,
    pub browse_name: QualifiedName,
    pub display_name: LocalizedText,
    pub description: Option<LocalizedText>,
}

impl NodeHeader {
    pub fn new(node_id: NodeId, browse_name: QualifiedName, display_name: LocalizedText) -> Self {
        Self {
            node_id,
            browse_name,
            display_name,
            description: None,
        }
    }

    /// Header whose browse name lives in the node's own namespace and whose
    /// display name is the same text in English.
    pub fn named(node_id: NodeId, name: &str) -> Self {
        let browse_name = QualifiedName::new(node_id.namespace, name);
        Self::new(node_id, browse_name, LocalizedText::english(name))
    }

    pub fn with_description(mut self, description: LocalizedText) -> Self {
        self.description = Some(description);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectNode {
    pub type_definition: NodeId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectTypeNode {
    pub is_abstract: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableTypeNode {
    pub is_abstract: bool,
    pub data_type: NodeId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataTypeNode {
    pub is_abstract: bool,
    /// Id of the "Default Binary" encoding node, for structured types.
    pub binary_encoding: Option<NodeId>,
}

/// Per-class payload of a [`Node`].
#[derive(Debug)]
pub enum NodeKind {
    Folder,
    Object(ObjectNode),
    Variable(VariableNode),
    ObjectType(ObjectTypeNode),
    VariableType(VariableTypeNode),
    DataType(DataTypeNode),
    Method(MethodNode),
}

impl NodeKind {
    fn type_definition(&self) -> Option<(NodeId, NodeClass)> {
        match self {
            Self::Folder => Some((ids::FOLDER_TYPE, NodeClass::ObjectType)),
            Self::Object(object) => Some((object.type_definition.clone(), NodeClass::ObjectType)),
            Self::Variable(variable) => {
                Some((variable.type_definition.clone(), NodeClass::VariableType))
            }
            _ => None,
        }
    }
}

/// A node in the address space.
#[derive(Debug)]
pub struct Node {
    pub header: NodeHeader,
    pub references: Vec<Reference>,
    pub kind: NodeKind,
}

impl Node {
    /// Create a node. Objects, folders and variables start out with a
    /// forward HasTypeDefinition reference to their type.
    pub fn new(header: NodeHeader, kind: NodeKind) -> Self {
        let references = kind
            .type_definition()
            .map(|(type_id, class)| Reference::forward(ids::HAS_TYPE_DEFINITION, type_id, class))
            .into_iter()
            .collect();
        Self {
            header,
            references,
            kind,
        }
    }

    pub fn folder(node_id: NodeId, name: &str) -> Self {
        Self::new(NodeHeader::named(node_id, name), NodeKind::Folder)
    }

    pub fn object(node_id: NodeId, name: &str, type_definition: NodeId) -> Self {
        Self::new(
            NodeHeader::named(node_id, name),
            NodeKind::Object(ObjectNode { type_definition }),
        )
    }

    pub fn variable(node_id: NodeId, name: &str, variable: VariableNode) -> Self {
        Self::new(NodeHeader::named(node_id, name), NodeKind::Variable(variable))
    }

    pub fn object_type(node_id: NodeId, name: &str, is_abstract: bool) -> Self {
        Self::new(
            NodeHeader::named(node_id, name),
            NodeKind::ObjectType(ObjectTypeNode { is_abstract }),
        )
    }

    pub fn data_type(node_id: NodeId, name: &str, is_abstract: bool) -> Self {
        Self::new(
            NodeHeader::named(node_id, name),
            NodeKind::DataType(DataTypeNode {
                is_abstract,
                binary_encoding: None,
            }),
        )
    }

    pub fn method(node_id: NodeId, name: &str, method: MethodNode) -> Self {
        Self::new(NodeHeader::named(node_id, name), NodeKind::Method(method))
    }

    pub fn node_id(&self) -> &NodeId {
        &self.header.node_id
    }

    pub fn browse_name(&self) -> &QualifiedName {
        &self.header.browse_name
    }

    /// Node class derived from the payload. Folders are objects.
    pub fn node_class(&self) -> NodeClass {
        match &self.kind {
            NodeKind::Folder | NodeKind::Object(_) => NodeClass::Object,
            NodeKind::Variable(_) => NodeClass::Variable,
            NodeKind::ObjectType(_) => NodeClass::ObjectType,
            NodeKind::VariableType(_) => NodeClass::VariableType,
            NodeKind::DataType(_) => NodeClass::DataType,
            NodeKind::Method(_) => NodeClass::Method,
        }
    }

    /// `IsAbstract` for type nodes, `None` otherwise.
    pub fn is_abstract(&self) -> Option<bool> {
        match &self.kind {
            NodeKind::ObjectType(t) => Some(t.is_abstract),
            NodeKind::VariableType(t) => Some(t.is_abstract),
            NodeKind::DataType(t) => Some(t.is_abstract),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<VariableRef<'_>> {
        match &self.kind {
            NodeKind::Variable(variable) => Some(VariableRef {
                node: self,
                variable,
            }),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&MethodNode> {
        match &self.kind {
            NodeKind::Method(method) => Some(method),
            _ => None,
        }
    }

    pub fn as_data_type(&self) -> Option<&DataTypeNode> {
        match &self.kind {
            NodeKind::DataType(data_type) => Some(data_type),
            _ => None,
        }
    }

    /// Forward references of the given type.
    pub fn forward_references(&self, reference_type: &NodeId) -> impl Iterator<Item = &Reference> {
        let reference_type = reference_type.clone();
        self.references
            .iter()
            .filter(move |r| r.is_forward && r.reference_type == reference_type)
    }
}
