//! Merge rules: defaults first, then files, then environment.

use crate::item::NT_UNSTRUCTURED;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("session.default_node_type", NT_UNSTRUCTURED)?
        .set_default("session.normalize_unicode", true)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")
}
