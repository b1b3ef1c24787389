//! Binary codec for UASim structured values.
//!
//! Custom structured types are described by a [`StructuredTypeDescriptor`]
//! (an ordered list of primitive fields) and registered in a
//! [`TypeRegistry`] under their binary-encoding id. The registry then
//! encodes and decodes [`StructuredValue`]s to and from the untagged,
//! positional binary layout carried inside extension objects.
//!
//! # Quick Start
//!
//! ```rust
//! use uasim_codec::{FieldKind, StructuredTypeDescriptor, StructuredValue, TypeRegistry};
//! use uasim_types::NodeId;
//!
//! let encoding = NodeId::string(2, "Point.Binary");
//! let mut registry = TypeRegistry::new();
//! registry
//!     .register_type(
//!         StructuredTypeDescriptor::new("Point", "urn:demo", NodeId::string(2, "Point"), encoding.clone())
//!             .field("X", FieldKind::Double)
//!             .field("Y", FieldKind::Double),
//!     )
//!     .unwrap();
//!
//! let value = StructuredValue::new(encoding.clone())
//!     .with_field("X", 1.0f64)
//!     .with_field("Y", 2.0f64);
//! let bytes = registry.encode(&value).unwrap();
//! assert_eq!(bytes.len(), 16);
//! assert_eq!(registry.decode(&bytes, &encoding).unwrap(), value);
//! ```

pub mod binary;
pub mod descriptor;
pub mod error;
pub mod registry;
pub mod value;

pub use binary::{BinaryDecoder, BinaryEncoder};
pub use descriptor::{FieldDescriptor, FieldKind, StructuredTypeDescriptor};
pub use error::{CodecError, CodecResult};
pub use registry::{TypeRegistration, TypeRegistry};
pub use value::{StructuredType, StructuredValue};
