//! Address space for UASim.
//!
//! This crate holds the in-memory information model: nodes of every class,
//! the typed references between them, and the seams through which a
//! Variable's value is produced ([`AttributeDelegate`] chains), guarded
//! ([`AccessPolicy`]) and through which methods run ([`MethodHandler`]).
//!
//! # Lifecycle
//!
//! 1. Start from [`AddressSpace::with_core_nodes`].
//! 2. Build namespaces with `&mut AddressSpace`: [`AddressSpace::add_node`],
//!    [`AddressSpace::link`], [`AddressSpace::instantiate_object`].
//! 3. Share the finished space behind an `Arc`. From then on only Variable
//!    values change, through each node's interior lock.
//!
//! # Quick Start
//!
//! ```rust
//! use uasim_space::{AddressSpace, Node, VariableNode};
//! use uasim_types::{ids, AccessLevel, DataValue, NodeId};
//!
//! let mut space = AddressSpace::with_core_nodes();
//! let folder = NodeId::string(1, "Plant");
//! space.add_node(Node::folder(folder.clone(), "Plant")).unwrap();
//! space.link(&ids::OBJECTS_FOLDER, &ids::ORGANIZES, &folder).unwrap();
//!
//! let temp = NodeId::string(1, "Plant/Temperature");
//! let variable = VariableNode::new(ids::DOUBLE, DataValue::new(21.5f64)).access(AccessLevel::READ_WRITE);
//! space.add_node(Node::variable(temp.clone(), "Temperature", variable)).unwrap();
//! space.link(&folder, &ids::ORGANIZES, &temp).unwrap();
//!
//! assert!(space.asymmetric_references(None).is_empty());
//! ```

pub mod delegate;
pub mod error;
pub mod method;
pub mod node;
pub mod policy;
pub mod reference;
pub mod space;
pub mod variable;

pub use delegate::{AttributeContext, AttributeDelegate, DelegateChain, Next};
pub use error::{DelegateError, DelegateResult, SpaceError, SpaceResult};
pub use method::{Argument, InvocationContext, MethodHandler, MethodNode};
pub use node::{
    DataTypeNode, Node, NodeHeader, NodeKind, ObjectNode, ObjectTypeNode, VariableTypeNode,
};
pub use policy::{AccessOperation, AccessPolicy};
pub use reference::{Asymmetry, Reference};
pub use space::{AddressSpace, SYMMETRIC_REFERENCE_TYPES};
pub use variable::{VariableNode, VariableRef};
