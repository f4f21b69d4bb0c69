//! Config loading entry point: one call assembles every layer.

use super::merge::merge_policy;
use super::sources::{environment, global_file, project_file};
use super::MemrepoConfig;
use crate::error::ApiError;
use config::builder::DefaultState;
use config::{ConfigBuilder, File};
use std::path::Path;
use tracing::debug;

/// Loads `MemrepoConfig` from defaults, config files and the environment.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Layered load, lowest precedence first: defaults, the global file,
    /// `<project_root>/memrepo.toml`, then `MEMREPO_*` environment variables.
    pub fn load(project_root: &Path) -> Result<MemrepoConfig, ApiError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = project_file::add_to_builder(builder, project_root)?;
        let builder = environment::add_to_builder(builder);
        Self::finish(builder)
    }

    /// Load from one explicit file (which must exist) over the defaults.
    /// Environment variables still take precedence.
    pub fn load_from_file(path: &Path) -> Result<MemrepoConfig, ApiError> {
        if !path.exists() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true));
        let builder = environment::add_to_builder(builder);
        Self::finish(builder)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<MemrepoConfig, ApiError> {
        let config: MemrepoConfig = builder.build()?.try_deserialize()?;
        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        debug!(
            default_node_type = %config.session.default_node_type,
            log_level = %config.logging.level,
            "Configuration loaded"
        );
        Ok(config)
    }
}
