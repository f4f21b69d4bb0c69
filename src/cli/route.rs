//! CLI route: dispatch parsed commands to fixture loading and presentation.

use super::parse::Commands;
use super::presentation;
use crate::config::{ConfigLoader, MemrepoConfig};
use crate::error::ApiError;
use crate::export;
use crate::fixture::FixtureDocument;
use crate::session::Session;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Everything a command needs: the loaded configuration.
pub struct RunContext {
    config: MemrepoConfig,
}

impl RunContext {
    /// Create run context from the project root and optional config path.
    pub fn new(root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&root)?,
        };
        debug!(root = %root.display(), "Run context ready");
        Ok(Self { config })
    }

    pub fn from_config(config: MemrepoConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MemrepoConfig {
        &self.config
    }

    /// Build the fixture at `path` into a fresh repository and log in.
    pub fn load_fixture(&self, path: &Path) -> Result<Session, ApiError> {
        let repository = FixtureDocument::load(path)?
            .to_builder()?
            .with_config(self.config.session.clone())
            .build()?;
        let session = repository.login();
        info!(fixture = %path.display(), items = session.item_count(), "Fixture built");
        Ok(session)
    }

    /// Run one command, returning the text to print.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Show { fixture, path } => {
                let session = self.load_fixture(fixture)?;
                Ok(presentation::format_items_table(&session, path)?)
            }
            Commands::Export {
                fixture,
                path,
                format,
            } => {
                let session = self.load_fixture(fixture)?;
                let document = export::export_path(&session, path)?;
                presentation::format_export(&document, *format)
            }
            Commands::Check { fixture } => {
                let session = self.load_fixture(fixture)?;
                session
                    .verify_index()
                    .map_err(|e| ApiError::FixtureError(format!("Store check failed: {}", e)))?;
                Ok(presentation::format_check_summary(fixture, &session))
            }
        }
    }
}
