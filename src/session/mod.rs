//! Session: the shared handle through which all items are read and written
//!
//! A `Session` is cheap to clone; clones share one item store. Each public
//! operation takes the store lock exactly once, so handles can be used freely
//! from the same thread without re-entrancy.

pub(crate) mod store;

use crate::config::SessionConfig;
use crate::error::RepositoryError;
use crate::item::{Item, ItemHandle, ItemId, Node, Property};
use crate::query::QuerySeed;
use crate::repository::Workspace;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::fmt;
use std::sync::Arc;
use store::ItemStore;
use tracing::{debug, info};

struct SessionShared {
    store: RwLock<ItemStore>,
    queries: RwLock<Vec<QuerySeed>>,
    config: SessionConfig,
}

/// Handle onto one in-memory item tree
#[derive(Clone)]
pub struct Session {
    shared: Arc<SessionShared>,
}

impl Session {
    /// Open a session over a fresh tree holding only the root node.
    pub fn new() -> Self {
        Self::with_config(&SessionConfig::default())
    }

    pub fn with_config(config: &SessionConfig) -> Self {
        debug!(
            default_node_type = %config.default_node_type,
            normalize_unicode = config.normalize_unicode,
            "Opening session"
        );
        Self {
            shared: Arc::new(SessionShared {
                store: RwLock::new(ItemStore::new(config.normalize_unicode)),
                queries: RwLock::new(Vec::new()),
                config: config.clone(),
            }),
        }
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, ItemStore> {
        self.shared.store.read()
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, ItemStore> {
        self.shared.store.write()
    }

    pub(crate) fn queries(&self) -> &RwLock<Vec<QuerySeed>> {
        &self.shared.queries
    }

    pub fn config(&self) -> &SessionConfig {
        &self.shared.config
    }

    pub fn same_session(&self, other: &Session) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    pub fn root_node(&self) -> Node {
        let root = self.read().root_id();
        Node::new(self.clone(), root)
    }

    pub fn workspace(&self) -> Workspace {
        Workspace::new(self.clone())
    }

    /// Item at an absolute path.
    pub fn get_item(&self, path: &str) -> Result<Item, RepositoryError> {
        let found = self.read().get(path).map(|r| (r.id, r.is_node()));
        match found {
            Some((id, is_node)) => Ok(Item::wrap(self, id, is_node)),
            None => Err(RepositoryError::PathNotFound(path.to_string())),
        }
    }

    /// Node at an absolute path; a property there counts as not found.
    pub fn get_node(&self, path: &str) -> Result<Node, RepositoryError> {
        self.get_item(path)?.into_node()
    }

    /// Property at an absolute path; a node there counts as not found.
    pub fn get_property(&self, path: &str) -> Result<Property, RepositoryError> {
        self.get_item(path)?.into_property()
    }

    pub fn item_exists(&self, path: &str) -> bool {
        self.read().get(path).is_some()
    }

    pub fn node_exists(&self, path: &str) -> bool {
        self.read().node_exists(path)
    }

    pub fn property_exists(&self, path: &str) -> bool {
        self.read().get(path).is_some_and(|r| !r.is_node())
    }

    /// Live node carrying `identifier`.
    pub fn node_by_identifier(&self, identifier: &str) -> Result<Node, RepositoryError> {
        let id = ItemId::parse(identifier)?;
        match self.read().find(id).map(|r| r.is_node()) {
            Some(true) => Ok(Node::new(self.clone(), id)),
            _ => Err(RepositoryError::ItemNotFound(identifier.to_string())),
        }
    }

    /// Direct children of `node`, nodes and properties interleaved in store order.
    pub fn children(&self, node: &Node) -> Result<Vec<Item>, RepositoryError> {
        let children = self.read().children(node.id())?;
        Ok(children
            .into_iter()
            .map(|(id, is_node)| Item::wrap(self, id, is_node))
            .collect())
    }

    /// Move the item at `src`, with its subtree, to `dest`.
    pub fn move_item(&self, src: &str, dest: &str) -> Result<(), RepositoryError> {
        self.write().move_subtree(src, dest).map(|_| ())
    }

    /// Remove the item at `path` with its subtree.
    pub fn remove_item(&self, path: &str) -> Result<(), RepositoryError> {
        self.write().remove(path).map(|_| ())
    }

    /// Forget every pending change.
    pub fn save(&self) -> Result<(), RepositoryError> {
        self.write().save_all();
        Ok(())
    }

    pub fn has_pending_changes(&self) -> bool {
        self.read().has_pending_changes()
    }

    /// Number of stored items, the root included.
    pub fn item_count(&self) -> usize {
        self.read().len()
    }

    pub fn import_xml(&self, _parent_path: &str, _xml: &str) -> Result<(), RepositoryError> {
        Err(RepositoryError::unsupported("import_xml"))
    }

    /// Check the store's internal consistency.
    ///
    /// Every stored item must report its own key as its path, every non-root
    /// item must have a parent node, and pending paths must be stored.
    pub fn verify_index(&self) -> Result<(), String> {
        self.read().verify()
    }

    pub fn logout(&self) {
        info!(items = self.item_count(), "Session closed");
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("items", &self.item_count())
            .field("pending", &self.has_pending_changes())
            .finish()
    }
}
