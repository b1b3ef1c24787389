//! Namespace builder for UASim.
//!
//! [`NamespaceBuilder`] populates one namespace of an
//! [`AddressSpace`](uasim_space::AddressSpace) with the simulation nodes:
//! a variable per built-in scalar type, the `sqrt(x)` method, a custom
//! structure ([`CustomDataType`]) with its codec registration, an object
//! type with an instance, and folders demonstrating write-only, per-identity
//! and randomly generated values.
//!
//! # Quick Start
//!
//! ```rust
//! use uasim_codec::TypeRegistry;
//! use uasim_namespace::NamespaceBuilder;
//! use uasim_space::AddressSpace;
//! use uasim_types::NodeId;
//!
//! let mut space = AddressSpace::with_core_nodes();
//! let mut registry = TypeRegistry::new();
//! let summary = NamespaceBuilder::new(1, "urn:uasim:simulation", "Simulation")
//!     .build(&mut space, &mut registry)
//!     .unwrap();
//!
//! assert_eq!(summary.root, NodeId::string(1, "Simulation"));
//! assert!(space.contains(&NodeId::string(1, "Simulation/Dynamic/Boolean")));
//! assert!(space.asymmetric_references(None).is_empty());
//! ```

pub mod builder;
pub mod custom;
pub mod error;
pub mod scalar;
pub mod sqrt;

pub use builder::{NamespaceBuilder, NamespaceSummary};
pub use custom::{CustomDataType, DICTIONARY_URI};
pub use error::{BuildError, BuildResult};
pub use scalar::{default_scalars, ScalarDescriptor};
pub use sqrt::SqrtMethod;
