//! Repository and workspace facades over a single shared session

use crate::config::SessionConfig;
use crate::error::RepositoryError;
use crate::item::{ItemHandle, Node};
use crate::query::QueryManager;
use crate::resource::ResourceResolver;
use crate::session::Session;
use tracing::{debug, info};

pub const DEFAULT_WORKSPACE: &str = "default";

/// An in-memory repository. Every login returns the same session.
#[derive(Clone, Debug)]
pub struct Repository {
    session: Session,
}

impl Repository {
    pub fn new() -> Self {
        Self::with_config(&SessionConfig::default())
    }

    pub fn with_config(config: &SessionConfig) -> Self {
        Self {
            session: Session::with_config(config),
        }
    }

    pub fn login(&self) -> Session {
        debug!("Login");
        self.session.clone()
    }

    /// Workspaces are not separated; the name is accepted and ignored.
    pub fn login_workspace(&self, workspace: &str) -> Session {
        debug!(workspace, "Login to workspace");
        self.session.clone()
    }

    pub fn root_node(&self) -> Node {
        self.session.root_node()
    }

    /// Resource view over this repository's session.
    pub fn resource_resolver(&self) -> ResourceResolver {
        ResourceResolver::new(self.session.clone())
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}

/// Workspace view of a session
#[derive(Clone, Debug)]
pub struct Workspace {
    session: Session,
}

impl Workspace {
    pub(crate) fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn name(&self) -> &str {
        DEFAULT_WORKSPACE
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn query_manager(&self) -> QueryManager {
        QueryManager::new(self.session.clone())
    }

    /// Deep-copy `src` to `dest` and save the copy.
    pub fn copy(&self, src: &str, dest: &str) -> Result<(), RepositoryError> {
        let copied = self.session.write().copy_subtree(src, dest)?;
        self.save_at(dest)?;
        info!(src, dest, copied, "Workspace copy");
        Ok(())
    }

    /// Move `src` to `dest` and save the moved subtree.
    pub fn move_item(&self, src: &str, dest: &str) -> Result<(), RepositoryError> {
        self.session.move_item(src, dest)?;
        self.save_at(dest)?;
        info!(src, dest, "Workspace move");
        Ok(())
    }

    pub fn clone_from(
        &self,
        _src_workspace: &str,
        _src: &str,
        _dest: &str,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::unsupported("clone_from"))
    }

    fn save_at(&self, path: &str) -> Result<(), RepositoryError> {
        self.session.get_item(path)?.save()
    }
}
