//! Foundation types for UASim.
//!
//! This crate provides the value model shared by every other UASim crate:
//! node identifiers, the tagged-union [`Variant`], [`DataValue`] results,
//! [`StatusCode`]s, access-level bitmasks, and caller identities.
//!
//! # Key Types
//!
//! - [`NodeId`]: (namespace index, identifier) address of a node
//! - [`ExpandedNodeId`]: node id that may point into another namespace or server
//! - [`Variant`]: scalar or structured attribute value
//! - [`ExtensionObject`]: opaque structured payload keyed by an encoding id
//! - [`DataValue`]: value + status + timestamps returned by reads
//! - [`StatusCode`]: per-item Good/Bad result code
//! - [`AccessLevel`]: read/write permission bitmask
//! - [`Identity`]: already-authenticated caller identity

pub mod attribute;
pub mod data_value;
pub mod error;
pub mod ids;
pub mod identity;
pub mod names;
pub mod node_id;
pub mod status;
pub mod variant;

pub use attribute::{AccessLevel, AttributeId, NodeClass};
pub use data_value::{DataValue, TimestampsToReturn};
pub use error::TypeError;
pub use identity::Identity;
pub use names::{LocalizedText, QualifiedName};
pub use node_id::{ExpandedNodeId, Identifier, NodeId};
pub use status::StatusCode;
pub use variant::{ByteString, DateTime, ExtensionObject, Variant, XmlElement};
