use thiserror::Error;
use uasim_namespace::BuildError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("namespace already registered: {0}")]
    DuplicateNamespace(String),

    #[error("namespace table is full")]
    NamespaceTableFull,

    #[error("failed to build namespace {uri}: {source}")]
    Build {
        uri: String,
        #[source]
        source: BuildError,
    },
}

pub type ServerResult<T> = Result<T, ServerError>;
