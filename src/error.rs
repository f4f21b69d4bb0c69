//! Error types for the in-memory repository.

use thiserror::Error;

/// Errors raised by the item store, the item handles and the builders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Item already exists: {0}")]
    AlreadyExists(String),

    /// A node was requested where a property is stored, or the reverse.
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Value format error: {0}")]
    ValueFormat(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

impl RepositoryError {
    pub(crate) fn unsupported(operation: &str) -> Self {
        tracing::warn!(operation, "Unsupported repository operation invoked");
        RepositoryError::Unsupported(operation.to_string())
    }
}

/// Errors raised at the outer surface: configuration, logging, fixture files and the CLI.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Fixture error: {0}")]
    FixtureError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
