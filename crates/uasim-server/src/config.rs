use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub application_name: String,
    pub server_name: String,
    pub bind_port: u16,
    pub product_uri: String,
    pub namespaces: Vec<NamespaceConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            application_name: "UASim Simulation Server".into(),
            server_name: "uasim".into(),
            bind_port: 4840,
            product_uri: "urn:uasim:server".into(),
            namespaces: vec![
                NamespaceConfig::new("urn:uasim:simulation", "Simulation"),
                NamespaceConfig::new("urn:uasim:simulation2", "Simulation2"),
            ],
        }
    }
}

impl ServerConfig {
    /// Read and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Parse and validate TOML text. Missing fields take their defaults.
    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ServerResult<()> {
        if self.namespaces.is_empty() {
            return Err(ServerError::Config("at least one namespace is required".into()));
        }
        let mut seen = HashSet::new();
        for ns in &self.namespaces {
            if ns.uri.trim().is_empty() {
                return Err(ServerError::Config("namespace uri must not be empty".into()));
            }
            if ns.root_name.trim().is_empty() {
                return Err(ServerError::Config(format!("namespace {} has an empty root_name", ns.uri)));
            }
            if ns.scalar_folder.trim().is_empty() {
                return Err(ServerError::Config(format!("namespace {} has an empty scalar_folder", ns.uri)));
            }
            if !seen.insert(ns.uri.as_str()) {
                return Err(ServerError::Config(format!("namespace {} is listed twice", ns.uri)));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceConfig {
    pub uri: String,
    pub root_name: String,
    #[serde(default = "default_scalar_folder")]
    pub scalar_folder: String,
}

impl NamespaceConfig {
    pub fn new(uri: impl Into<String>, root_name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            root_name: root_name.into(),
            scalar_folder: default_scalar_folder(),
        }
    }
}

fn default_scalar_folder() -> String {
    "ScalarNodes".into()
}
