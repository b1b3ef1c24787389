use std::sync::Arc;

use tracing::{error, info};
use uasim_codec::TypeRegistry;
use uasim_dispatch::{AttributeDispatcher, RandomSource, ThreadRandom};
use uasim_namespace::{NamespaceBuilder, NamespaceSummary};
use uasim_space::AddressSpace;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::namespace_table::NamespaceTable;

/// Register `uri`, then build its namespace with the builder `make`
/// returns for the assigned index.
///
/// If the build fails, everything it added is rolled back: nodes and
/// references in the namespace, its registered types, and the table entry.
pub fn register_and_build(
    table: &mut NamespaceTable,
    space: &mut AddressSpace,
    registry: &mut TypeRegistry,
    uri: &str,
    make: impl FnOnce(u16) -> NamespaceBuilder,
) -> ServerResult<NamespaceSummary> {
    let index = table.register(uri)?;
    match make(index).build(space, registry) {
        Ok(summary) => {
            info!(uri, index, nodes = summary.nodes_added, "registered namespace");
            Ok(summary)
        }
        Err(source) => {
            let nodes = space.remove_namespace(index);
            let types = registry.unregister_namespace(index);
            table.pop();
            error!(uri, index, nodes, types, error = %source, "namespace build failed, rolled back");
            Err(ServerError::Build {
                uri: uri.to_string(),
                source,
            })
        }
    }
}

/// A started server: every configured namespace built, the address space
/// frozen behind an `Arc`, and a dispatcher serving it.
#[derive(Debug)]
pub struct UaServer {
    config: ServerConfig,
    namespaces: NamespaceTable,
    summaries: Vec<NamespaceSummary>,
    dispatcher: AttributeDispatcher,
}

impl UaServer {
    pub fn start(config: ServerConfig) -> ServerResult<Self> {
        Self::start_with_random(config, Arc::new(ThreadRandom))
    }

    /// Start with a specific random source for the Dynamic variables.
    pub fn start_with_random(config: ServerConfig, random: Arc<dyn RandomSource>) -> ServerResult<Self> {
        config.validate()?;

        let mut space = AddressSpace::with_core_nodes();
        let mut registry = TypeRegistry::new();
        let mut namespaces = NamespaceTable::new();
        let mut summaries = Vec::with_capacity(config.namespaces.len());

        for ns in &config.namespaces {
            let summary = register_and_build(&mut namespaces, &mut space, &mut registry, &ns.uri, |index| {
                NamespaceBuilder::new(index, ns.uri.clone(), ns.root_name.clone())
                    .scalar_folder(ns.scalar_folder.clone())
                    .random_source(Arc::clone(&random))
            })?;
            summaries.push(summary);
        }

        info!(
            application = %config.application_name,
            port = config.bind_port,
            namespaces = summaries.len(),
            nodes = space.len(),
            "server started"
        );

        let dispatcher = AttributeDispatcher::new(Arc::new(space), Arc::new(registry));
        Ok(Self {
            config,
            namespaces,
            summaries,
            dispatcher,
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn namespaces(&self) -> &NamespaceTable {
        &self.namespaces
    }

    /// One summary per configured namespace, in registration order.
    pub fn summaries(&self) -> &[NamespaceSummary] {
        &self.summaries
    }

    pub fn dispatcher(&self) -> &AttributeDispatcher {
        &self.dispatcher
    }

    pub fn space(&self) -> &AddressSpace {
        self.dispatcher.space()
    }
}
