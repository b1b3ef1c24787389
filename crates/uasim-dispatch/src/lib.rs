//! Attribute dispatch for UASim.
//!
//! [`AttributeDispatcher`] is the request surface over a built
//! [`AddressSpace`](uasim_space::AddressSpace): batched reads and writes,
//! browsing, codec lookup and method calls. Each batch item is resolved on
//! its own and reports its own status code.
//!
//! A Value read or write runs through these steps:
//!
//! 1. Resolve the node and attribute.
//! 2. Check access: the static AccessLevel, then the caller's effective
//!    level from the node's policy ([`access`]).
//! 3. For writes, check the value against the declared DataType
//!    ([`check_assignable`]).
//! 4. Run the node's delegate chain, ending at the stored value.
//!
//! This crate also provides the stock delegates: [`ValueLoggingDelegate`]
//! and [`DynamicValueDelegate`].
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use uasim_codec::TypeRegistry;
//! use uasim_dispatch::{AttributeDispatcher, ReadValueId, WriteValue};
//! use uasim_space::{AddressSpace, Node, VariableNode};
//! use uasim_types::{ids, AccessLevel, DataValue, Identity, NodeId, TimestampsToReturn, Variant};
//!
//! let mut space = AddressSpace::with_core_nodes();
//! let id = NodeId::string(1, "Counter");
//! let variable = VariableNode::new(ids::INT32, DataValue::new(0i32)).access(AccessLevel::READ_WRITE);
//! space.add_node(Node::variable(id.clone(), "Counter", variable)).unwrap();
//!
//! let dispatcher = AttributeDispatcher::new(Arc::new(space), Arc::new(TypeRegistry::new()));
//! let outcomes = dispatcher.write(&Identity::Anonymous, &[WriteValue::value(id.clone(), 5i32)]);
//! assert!(outcomes[0].is_good());
//!
//! let values = dispatcher.read(&Identity::Anonymous, 0.0, TimestampsToReturn::Both, &[ReadValueId::value(id)]);
//! assert_eq!(values[0].value, Some(Variant::Int32(5)));
//! ```

pub mod access;
pub mod dispatcher;
pub mod dynamic;
pub mod error;
pub mod logging;
pub mod request;
pub mod typecheck;

pub use access::IdentityAccessPolicy;
pub use dispatcher::AttributeDispatcher;
pub use dynamic::{DynamicValueDelegate, RandomSource, SeededRandom, ThreadRandom};
pub use error::{AttributeError, AttributeResult};
pub use logging::ValueLoggingDelegate;
pub use request::{CallResult, IndexRange, ReadValueId, WriteOutcome, WriteValue};
pub use typecheck::check_assignable;
