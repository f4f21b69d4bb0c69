//! Configuration System
//!
//! Layered configuration for sessions and logging. Defaults are merged with
//! an optional global file, an optional project file and `MEMREPO_*`
//! environment variables, then validated as a whole.

use crate::item::NT_UNSTRUCTURED;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;
pub use sources::project_file::{project_config_path, PROJECT_CONFIG_FILE};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemrepoConfig {
    /// Session behaviour
    #[serde(default)]
    pub session: SessionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings applied to every session opened from a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Primary type recorded on nodes created without an explicit type
    #[serde(default = "default_node_type")]
    pub default_node_type: String,

    /// Normalize paths to Unicode NFC before using them as store keys
    #[serde(default = "default_true")]
    pub normalize_unicode: bool,
}

fn default_node_type() -> String {
    NT_UNSTRUCTURED.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_node_type: default_node_type(),
            normalize_unicode: default_true(),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.default_node_type.is_empty() {
            return Err("default_node_type cannot be empty".to_string());
        }
        if self.default_node_type.contains('/') {
            return Err(format!(
                "default_node_type '{}' must not contain '/'",
                self.default_node_type
            ));
        }
        if self.default_node_type.trim() != self.default_node_type {
            return Err(format!(
                "default_node_type '{}' must not have surrounding whitespace",
                self.default_node_type
            ));
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Session(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Session(msg) => write!(f, "Session: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl MemrepoConfig {
    /// Validate the entire configuration, collecting every problem.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.session.validate() {
            errors.push(ValidationError::Session(e));
        }
        for e in self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
