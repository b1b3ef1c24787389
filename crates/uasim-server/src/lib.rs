//! Server context for UASim.
//!
//! Loads a [`ServerConfig`], registers each configured namespace in a
//! [`NamespaceTable`] and builds it into a fresh address space, then freezes
//! the result behind an [`AttributeDispatcher`](uasim_dispatch::AttributeDispatcher).
//! A namespace that fails to build is rolled back and startup fails.
//!
//! # Quick Start
//!
//! ```rust
//! use uasim_dispatch::ReadValueId;
//! use uasim_server::{ServerConfig, UaServer};
//! use uasim_types::{Identity, NodeId, TimestampsToReturn, Variant};
//!
//! let server = UaServer::start(ServerConfig::default()).unwrap();
//! let index = server.namespaces().index_of("urn:uasim:simulation").unwrap();
//!
//! let item = ReadValueId::value(NodeId::string(index, "Simulation/ScalarNodes/Int32"));
//! let values = server
//!     .dispatcher()
//!     .read(&Identity::Anonymous, 0.0, TimestampsToReturn::Both, &[item]);
//! assert_eq!(values[0].value, Some(Variant::Int32(32)));
//! ```

pub mod config;
pub mod error;
pub mod namespace_table;
pub mod server;

pub use config::{NamespaceConfig, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use namespace_table::NamespaceTable;
pub use server::{register_and_build, UaServer};
