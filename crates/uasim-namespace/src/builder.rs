//! Builds one simulation namespace into an address space.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};
use uasim_codec::{StructuredType, TypeRegistry};
use uasim_dispatch::{
    check_assignable, DynamicValueDelegate, IdentityAccessPolicy, RandomSource, ThreadRandom,
    ValueLoggingDelegate,
};
use uasim_space::{
    AddressSpace, DataTypeNode, Node, NodeHeader, NodeKind, ObjectNode, VariableNode,
};
use uasim_types::{
    ids, AccessLevel, DataValue, LocalizedText, NodeId, QualifiedName, Variant,
};

use crate::custom::CustomDataType;
use crate::error::{BuildError, BuildResult};
use crate::scalar::{default_scalars, ScalarDescriptor};
use crate::sqrt::SqrtMethod;

/// Browse name of the scalar folder, whatever its id.
const SCALAR_FOLDER_BROWSE_NAME: &str = "ScalarTypes";

/// What a successful build added.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NamespaceSummary {
    pub namespace: u16,
    pub uri: String,
    pub root: NodeId,
    pub nodes_added: usize,
    pub scalars: usize,
    pub registered_types: Vec<String>,
}

/// Builder for one namespace.
///
/// The layout under the root folder `<Root>`:
///
/// ```text
/// <Root>
/// ├── <Root>/<ScalarFolder>/<Name>   one read-write variable per scalar
/// ├── <Root>/sqrt(x)                 method (HasComponent)
/// ├── <Root>/CustomDataTypeVariable  holds a CustomDataType
/// ├── <Root>/MyObject                instance of ObjectTypes/MyObjectType
/// ├── <Root>/WriteOnly/String
/// ├── <Root>/OnlyAdminCanRead/String
/// ├── <Root>/OnlyAdminCanWrite/String
/// └── <Root>/Dynamic/{Boolean,Int32,Double}
/// ```
pub struct NamespaceBuilder {
    namespace: u16,
    uri: String,
    root_name: String,
    scalar_folder: String,
    scalars: Vec<ScalarDescriptor>,
    random: Arc<dyn RandomSource>,
}

impl NamespaceBuilder {
    pub fn new(namespace: u16, uri: impl Into<String>, root_name: impl Into<String>) -> Self {
        Self {
            namespace,
            uri: uri.into(),
            root_name: root_name.into(),
            scalar_folder: "ScalarNodes".into(),
            scalars: default_scalars(),
            random: Arc::new(ThreadRandom),
        }
    }

    pub fn scalar_folder(mut self, name: impl Into<String>) -> Self {
        self.scalar_folder = name.into();
        self
    }

    pub fn scalars(mut self, scalars: Vec<ScalarDescriptor>) -> Self {
        self.scalars = scalars;
        self
    }

    /// Random source for the Dynamic variables.
    pub fn random_source(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    pub fn namespace(&self) -> u16 {
        self.namespace
    }

    pub fn root_id(&self) -> NodeId {
        self.id(&self.root_name)
    }

    /// Add every node of the namespace and register its types.
    ///
    /// Scalars are validated before anything is added. A failure part way
    /// through leaves partial state behind; the caller rolls it back with
    /// [`AddressSpace::remove_namespace`] and
    /// [`TypeRegistry::unregister_namespace`].
    pub fn build(&self, space: &mut AddressSpace, registry: &mut TypeRegistry) -> BuildResult<NamespaceSummary> {
        if self.namespace == 0 {
            return Err(BuildError::ReservedNamespace);
        }
        for scalar in &self.scalars {
            check_assignable(space, registry, &scalar.data_type, &scalar.initial).map_err(|e| {
                BuildError::InvalidScalar {
                    name: scalar.name.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        let before = space.len();
        let root = self.root_id();

        self.add_root(space, &root)?;
        self.add_scalars(space, &root)?;
        self.add_sqrt_method(space, &root)?;
        let custom = self.add_custom_data_type(space, registry, &root)?;
        self.add_object_type_and_instance(space, &root)?;
        self.add_write_only(space, &root)?;
        self.add_admin_readable(space, &root)?;
        self.add_admin_writable(space, &root)?;
        self.add_dynamic(space, &root)?;

        let summary = NamespaceSummary {
            namespace: self.namespace,
            uri: self.uri.clone(),
            root,
            nodes_added: space.len() - before,
            scalars: self.scalars.len(),
            registered_types: vec![custom],
        };
        info!(
            namespace = summary.namespace,
            uri = %summary.uri,
            nodes = summary.nodes_added,
            "built namespace"
        );
        Ok(summary)
    }

    // ---------------------------------------------------------------
    // Steps
    // ---------------------------------------------------------------

    fn add_root(&self, space: &mut AddressSpace, root: &NodeId) -> BuildResult<()> {
        space.add_node(Node::folder(root.clone(), &self.root_name))?;
        space.link(&ids::OBJECTS_FOLDER, &ids::ORGANIZES, root)?;
        Ok(())
    }

    fn add_scalars(&self, space: &mut AddressSpace, root: &NodeId) -> BuildResult<()> {
        let folder = self.path(&self.scalar_folder);
        let header = NodeHeader::new(
            folder.clone(),
            QualifiedName::new(self.namespace, SCALAR_FOLDER_BROWSE_NAME),
            LocalizedText::english(SCALAR_FOLDER_BROWSE_NAME),
        );
        space.add_node(Node::new(header, NodeKind::Folder))?;
        space.link(root, &ids::ORGANIZES, &folder)?;

        for scalar in &self.scalars {
            let id = self.path(&format!("{}/{}", self.scalar_folder, scalar.name));
            let variable = VariableNode::new(scalar.data_type.clone(), DataValue::new(scalar.initial.clone()))
                .access(AccessLevel::READ_WRITE)
                .delegate(Arc::new(ValueLoggingDelegate));
            self.add_variable(space, &folder, id, &scalar.name, variable)?;
        }
        debug!(namespace = self.namespace, count = self.scalars.len(), "added scalar nodes");
        Ok(())
    }

    fn add_sqrt_method(&self, space: &mut AddressSpace, root: &NodeId) -> BuildResult<()> {
        let id = self.path("sqrt(x)");
        let header = NodeHeader::named(id.clone(), "sqrt(x)")
            .with_description(LocalizedText::english(SqrtMethod::DESCRIPTION));
        space.add_node(Node::new(header, NodeKind::Method(SqrtMethod.node())))?;
        space.link(root, &ids::HAS_COMPONENT, &id)?;
        Ok(())
    }

    /// Returns the registered type's name.
    fn add_custom_data_type(
        &self,
        space: &mut AddressSpace,
        registry: &mut TypeRegistry,
        root: &NodeId,
    ) -> BuildResult<String> {
        let type_id = self.id("DataType.CustomDataType");
        let encoding_id = self.id("DataType.CustomDataType.BinaryEncoding");

        space.add_node(Node::new(
            NodeHeader::named(type_id.clone(), CustomDataType::TYPE_NAME),
            NodeKind::DataType(DataTypeNode {
                is_abstract: false,
                binary_encoding: Some(encoding_id.clone()),
            }),
        ))?;
        space.link(&ids::STRUCTURE, &ids::HAS_SUBTYPE, &type_id)?;

        space.add_node(Node::new(
            NodeHeader::new(
                encoding_id.clone(),
                QualifiedName::new(0, ids::DEFAULT_BINARY),
                LocalizedText::english(ids::DEFAULT_BINARY),
            ),
            NodeKind::Object(ObjectNode {
                type_definition: ids::DATA_TYPE_ENCODING_TYPE,
            }),
        ))?;
        space.link(&type_id, &ids::HAS_ENCODING, &encoding_id)?;

        let registration = registry.register_type(CustomDataType::descriptor(type_id.clone(), encoding_id.clone()))?;

        let initial = CustomDataType::new("foo", 42, true);
        let xo = registry.encode_extension_object(&initial.to_structured(encoding_id))?;
        let variable = VariableNode::new(type_id, DataValue::new(xo))
            .access(AccessLevel::READ_WRITE)
            .delegate(Arc::new(ValueLoggingDelegate));
        self.add_variable(space, root, self.path("CustomDataTypeVariable"), "CustomDataTypeVariable", variable)?;

        Ok(registration.name)
    }

    fn add_object_type_and_instance(&self, space: &mut AddressSpace, root: &NodeId) -> BuildResult<()> {
        let type_id = self.id("ObjectTypes/MyObjectType");
        space.add_node(Node::object_type(type_id.clone(), "MyObjectType", false))?;
        space.link(&ids::BASE_OBJECT_TYPE, &ids::HAS_SUBTYPE, &type_id)?;

        let members: [(&str, NodeId, Variant); 2] = [
            ("Foo", ids::INT16, Variant::Int16(0)),
            ("Bar", ids::STRING, Variant::from("bar")),
        ];
        for (name, data_type, initial) in members {
            let id = self.id(&format!("ObjectTypes/MyObjectType.{name}"));
            let variable = VariableNode::new(data_type, DataValue::new(initial)).access(AccessLevel::READ_WRITE);
            space.add_node(Node::variable(id.clone(), name, variable))?;
            space.link(&type_id, &ids::HAS_COMPONENT, &id)?;
        }

        let object = self.path("MyObject");
        space.instantiate_object(
            &type_id,
            object.clone(),
            QualifiedName::new(self.namespace, "MyObject"),
            LocalizedText::english("MyObject"),
        )?;
        space.link(root, &ids::ORGANIZES, &object)?;
        Ok(())
    }

    fn add_write_only(&self, space: &mut AddressSpace, root: &NodeId) -> BuildResult<()> {
        let folder = self.add_folder(space, root, "WriteOnly")?;
        let variable = VariableNode::new(ids::STRING, DataValue::new("can't read this"))
            .access(AccessLevel::WRITE_ONLY)
            .delegate(Arc::new(ValueLoggingDelegate));
        self.add_variable(space, &folder, self.path("WriteOnly/String"), "String", variable)
    }

    fn add_admin_readable(&self, space: &mut AddressSpace, root: &NodeId) -> BuildResult<()> {
        let folder = self.add_folder(space, root, "OnlyAdminCanRead")?;
        let policy = IdentityAccessPolicy::new(AccessLevel::READ_WRITE, AccessLevel::NONE).allow("admin");
        let variable = VariableNode::new(ids::STRING, DataValue::new("shh... don't tell the lusers"))
            .access_level(AccessLevel::READ_WRITE)
            .access_policy(Arc::new(policy))
            .delegate(Arc::new(ValueLoggingDelegate));
        self.add_variable(space, &folder, self.path("OnlyAdminCanRead/String"), "String", variable)
    }

    fn add_admin_writable(&self, space: &mut AddressSpace, root: &NodeId) -> BuildResult<()> {
        let folder = self.add_folder(space, root, "OnlyAdminCanWrite")?;
        let policy = IdentityAccessPolicy::new(AccessLevel::READ_WRITE, AccessLevel::READ_ONLY).allow("admin");
        let variable = VariableNode::new(ids::STRING, DataValue::new("admin was here"))
            .access_level(AccessLevel::READ_WRITE)
            .access_policy(Arc::new(policy))
            .delegate(Arc::new(ValueLoggingDelegate));
        self.add_variable(space, &folder, self.path("OnlyAdminCanWrite/String"), "String", variable)
    }

    fn add_dynamic(&self, space: &mut AddressSpace, root: &NodeId) -> BuildResult<()> {
        let folder = self.add_folder(space, root, "Dynamic")?;
        let dynamic = Arc::new(DynamicValueDelegate::new(Arc::clone(&self.random)));

        let nodes: [(&str, NodeId, Variant); 3] = [
            ("Boolean", ids::BOOLEAN, Variant::Boolean(false)),
            ("Int32", ids::INT32, Variant::Int32(0)),
            ("Double", ids::DOUBLE, Variant::Double(0.0)),
        ];
        for (name, data_type, initial) in nodes {
            let variable = VariableNode::new(data_type, DataValue::new(initial))
                .access(AccessLevel::READ_WRITE)
                .delegate(Arc::new(ValueLoggingDelegate))
                .delegate(dynamic.clone());
            self.add_variable(space, &folder, self.path(&format!("Dynamic/{name}")), name, variable)?;
        }
        Ok(())
    }

    // ---------------------------------------------------------------
    // Helpers
    // ---------------------------------------------------------------

    fn id(&self, identifier: &str) -> NodeId {
        NodeId::string(self.namespace, identifier)
    }

    /// Id of a node under the root folder.
    fn path(&self, relative: &str) -> NodeId {
        self.id(&format!("{}/{relative}", self.root_name))
    }

    fn add_folder(&self, space: &mut AddressSpace, parent: &NodeId, name: &str) -> BuildResult<NodeId> {
        let id = self.path(name);
        space.add_node(Node::folder(id.clone(), name))?;
        space.link(parent, &ids::ORGANIZES, &id)?;
        Ok(id)
    }

    fn add_variable(
        &self,
        space: &mut AddressSpace,
        parent: &NodeId,
        id: NodeId,
        name: &str,
        variable: VariableNode,
    ) -> BuildResult<()> {
        space.add_node(Node::variable(id.clone(), name, variable))?;
        space.link(parent, &ids::ORGANIZES, &id)?;
        Ok(())
    }
}

impl fmt::Debug for NamespaceBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamespaceBuilder")
            .field("namespace", &self.namespace)
            .field("uri", &self.uri)
            .field("root_name", &self.root_name)
            .field("scalar_folder", &self.scalar_folder)
            .field("scalars", &self.scalars.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uasim_space::SpaceError;

    fn build(namespace: u16, root: &str) -> (AddressSpace, TypeRegistry, NamespaceSummary) {
        let mut space = AddressSpace::with_core_nodes();
        let mut registry = TypeRegistry::new();
        let summary = NamespaceBuilder::new(namespace, "urn:test", root)
            .build(&mut space, &mut registry)
            .unwrap();
        (space, registry, summary)
    }

    fn sid(s: &str) -> NodeId {
        NodeId::string(1, s)
    }

    #[test]
    fn layout() {
        let (space, _, summary) = build(1, "Simulation");
        assert_eq!(summary.root, sid("Simulation"));
        assert_eq!(summary.scalars, 21);
        assert_eq!(summary.registered_types, vec!["CustomDataType".to_string()]);

        for id in [
            "Simulation/ScalarNodes",
            "Simulation/ScalarNodes/Boolean",
            "Simulation/ScalarNodes/UtcTime",
            "Simulation/sqrt(x)",
            "DataType.CustomDataType",
            "DataType.CustomDataType.BinaryEncoding",
            "Simulation/CustomDataTypeVariable",
            "ObjectTypes/MyObjectType",
            "ObjectTypes/MyObjectType.Foo",
            "Simulation/MyObject",
            "Simulation/MyObject.Foo",
            "Simulation/MyObject.Bar",
            "Simulation/WriteOnly/String",
            "Simulation/OnlyAdminCanRead/String",
            "Simulation/OnlyAdminCanWrite/String",
            "Simulation/Dynamic/Boolean",
            "Simulation/Dynamic/Int32",
            "Simulation/Dynamic/Double",
        ] {
            assert!(space.contains(&sid(id)), "missing {id}");
        }

        let folder = space.get(&sid("Simulation/ScalarNodes")).unwrap();
        assert_eq!(folder.browse_name().name, "ScalarTypes");
    }

    #[test]
    fn builder_output_is_symmetric() {
        let (space, _, _) = build(1, "Simulation");
        assert!(space.asymmetric_references(None).is_empty());
    }

    #[test]
    fn custom_type_is_a_registered_structure() {
        let (space, registry, _) = build(1, "Simulation");
        let type_id = sid("DataType.CustomDataType");
        assert!(space.is_subtype_of(&type_id, &ids::STRUCTURE));
        assert_eq!(
            registry.encoding_for_data_type(&type_id),
            Some(&sid("DataType.CustomDataType.BinaryEncoding"))
        );

        let node = space.get(&sid("Simulation/CustomDataTypeVariable")).unwrap();
        let Some(Variant::ExtensionObject(xo)) = node.as_variable().unwrap().variable.stored_value().value else {
            panic!("expected an extension object");
        };
        let value = CustomDataType::from_structured(&registry.decode_extension_object(&xo).unwrap()).unwrap();
        assert_eq!(value, CustomDataType::new("foo", 42, true));
    }

    #[test]
    fn dynamic_chain_order() {
        let (space, _, _) = build(1, "Simulation");
        let node = space.get(&sid("Simulation/Dynamic/Boolean")).unwrap();
        let names = node.as_variable().unwrap().variable.chain().names();
        assert_eq!(names, ["value-logging", "dynamic-value"]);
    }

    #[test]
    fn instance_members_are_components() {
        let (space, _, _) = build(1, "Simulation");
        let object = space.get(&sid("Simulation/MyObject")).unwrap();
        let members: Vec<_> = object
            .forward_references(&ids::HAS_COMPONENT)
            .filter_map(|r| r.local_target().cloned())
            .collect();
        assert_eq!(members.len(), 2);
        assert!(members.contains(&sid("Simulation/MyObject.Foo")));
    }

    #[test]
    fn two_namespaces_coexist() {
        let mut space = AddressSpace::with_core_nodes();
        let mut registry = TypeRegistry::new();
        NamespaceBuilder::new(1, "urn:a", "Simulation")
            .build(&mut space, &mut registry)
            .unwrap();
        NamespaceBuilder::new(2, "urn:b", "Simulation2")
            .build(&mut space, &mut registry)
            .unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.dictionary(crate::custom::DICTIONARY_URI).len(), 2);
        assert!(space.asymmetric_references(None).is_empty());
    }

    #[test]
    fn building_twice_fails_on_duplicate_id() {
        let (mut space, mut registry, _) = build(1, "Simulation");
        let err = NamespaceBuilder::new(1, "urn:test", "Simulation")
            .build(&mut space, &mut registry)
            .unwrap_err();
        assert_eq!(err, BuildError::Space(SpaceError::DuplicateNodeId(sid("Simulation"))));
    }

    #[test]
    fn invalid_scalar_is_rejected_before_any_change() {
        let mut space = AddressSpace::with_core_nodes();
        let mut registry = TypeRegistry::new();
        let before = space.len();
        let err = NamespaceBuilder::new(1, "urn:test", "Simulation")
            .scalars(vec![ScalarDescriptor::new("Broken", ids::STRING, 5i32)])
            .build(&mut space, &mut registry)
            .unwrap_err();
        assert!(matches!(err, BuildError::InvalidScalar { ref name, .. } if name == "Broken"));
        assert_eq!(space.len(), before);
    }

    #[test]
    fn namespace_zero_is_reserved() {
        let mut space = AddressSpace::with_core_nodes();
        let mut registry = TypeRegistry::new();
        let err = NamespaceBuilder::new(0, "urn:test", "Simulation")
            .build(&mut space, &mut registry)
            .unwrap_err();
        assert_eq!(err, BuildError::ReservedNamespace);
    }
}
