//! Item handles: nodes and properties
//!
//! Handles are lightweight views onto a session's store. A handle holds the
//! session and the item's identity, never a copy of the item's path, so it
//! follows its item through moves and reports removal through `is_live`.

mod node;
mod property;

pub use node::Node;
pub use property::Property;

use crate::error::RepositoryError;
use crate::path;
use crate::session::Session;
use std::fmt;
use uuid::Uuid;

/// Name of the property recording a node's primary type
pub const PRIMARY_TYPE: &str = "jcr:primaryType";

/// Default primary type for nodes created without one
pub const NT_UNSTRUCTURED: &str = "nt:unstructured";
pub const NT_FOLDER: &str = "nt:folder";
pub const NT_FILE: &str = "nt:file";

/// Stable identity of a stored item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(Uuid);

impl ItemId {
    pub(crate) fn generate() -> Self {
        ItemId(Uuid::new_v4())
    }

    pub fn parse(identifier: &str) -> Result<Self, RepositoryError> {
        Uuid::parse_str(identifier)
            .map(ItemId)
            .map_err(|e| RepositoryError::ItemNotFound(format!("{}: {}", identifier, e)))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Operations shared by nodes and properties.
pub trait ItemHandle {
    fn session(&self) -> &Session;

    fn id(&self) -> ItemId;

    fn is_node(&self) -> bool;

    /// Current absolute path; removed items report their last path.
    fn path(&self) -> String {
        self.session()
            .read()
            .path_of(self.id())
            .map(str::to_string)
            .unwrap_or_default()
    }

    fn name(&self) -> String {
        path::basename(&self.path()).to_string()
    }

    fn depth(&self) -> usize {
        path::depth(&self.path())
    }

    /// False once the item (or an ancestor) has been removed.
    fn is_live(&self) -> bool {
        self.session().read().is_live(self.id())
    }

    fn parent(&self) -> Result<Node, RepositoryError> {
        let path = self.session().read().live_path(self.id())?;
        if path::is_root(&path) {
            return Err(RepositoryError::ItemNotFound(
                "the root node has no parent".to_string(),
            ));
        }
        self.session().get_node(&path::parent(&path))
    }

    /// The ancestor at `depth`; depth 0 is the root, the item's own depth is itself.
    fn ancestor(&self, depth: usize) -> Result<Item, RepositoryError> {
        let path = self.session().read().live_path(self.id())?;
        let own_depth = path::depth(&path);
        if depth > own_depth {
            return Err(RepositoryError::ItemNotFound(format!(
                "{} has no ancestor at depth {}",
                path, depth
            )));
        }
        let ancestor = path::segments(&path)
            .take(depth)
            .fold(path::ROOT.to_string(), |acc, segment| {
                path::resolve(&acc, segment)
            });
        self.session().get_item(&ancestor)
    }

    /// Added since the last save covering this item.
    fn is_new(&self) -> bool {
        let store = self.session().read();
        store
            .live_path(self.id())
            .map(|p| store.is_new(&p))
            .unwrap_or(false)
    }

    /// Changed (not added) since the last save covering this item.
    fn is_modified(&self) -> bool {
        let store = self.session().read();
        store
            .live_path(self.id())
            .map(|p| store.is_modified(&p))
            .unwrap_or(false)
    }

    /// Clear pending changes at this item's path and below.
    fn save(&self) -> Result<(), RepositoryError> {
        let mut store = self.session().write();
        let path = store.live_path(self.id())?;
        store.save_scoped(&path);
        Ok(())
    }

    /// Remove this item and everything beneath it.
    fn remove(&self) -> Result<(), RepositoryError> {
        let mut store = self.session().write();
        let path = store.live_path(self.id())?;
        store.remove(&path).map(|_| ())
    }

    /// Same underlying item in the same session.
    fn is_same(&self, other: &dyn ItemHandle) -> bool {
        self.session().same_session(other.session()) && self.id() == other.id()
    }
}

/// Either kind of item, as returned by path lookups
#[derive(Clone, Debug)]
pub enum Item {
    Node(Node),
    Property(Property),
}

impl Item {
    pub(crate) fn wrap(session: &Session, id: ItemId, is_node: bool) -> Self {
        if is_node {
            Item::Node(Node::new(session.clone(), id))
        } else {
            Item::Property(Property::new(session.clone(), id))
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Item::Node(node) => Some(node),
            Item::Property(_) => None,
        }
    }

    pub fn as_property(&self) -> Option<&Property> {
        match self {
            Item::Property(property) => Some(property),
            Item::Node(_) => None,
        }
    }

    pub fn into_node(self) -> Result<Node, RepositoryError> {
        match self {
            Item::Node(node) => Ok(node),
            Item::Property(p) => Err(RepositoryError::TypeMismatch(format!(
                "{} is a property, not a node",
                p.path()
            ))),
        }
    }

    pub fn into_property(self) -> Result<Property, RepositoryError> {
        match self {
            Item::Property(property) => Ok(property),
            Item::Node(n) => Err(RepositoryError::TypeMismatch(format!(
                "{} is a node, not a property",
                n.path()
            ))),
        }
    }
}

impl ItemHandle for Item {
    fn session(&self) -> &Session {
        match self {
            Item::Node(node) => node.session(),
            Item::Property(property) => property.session(),
        }
    }

    fn id(&self) -> ItemId {
        match self {
            Item::Node(node) => node.id(),
            Item::Property(property) => property.id(),
        }
    }

    fn is_node(&self) -> bool {
        matches!(self, Item::Node(_))
    }
}

impl From<Node> for Item {
    fn from(node: Node) -> Self {
        Item::Node(node)
    }
}

impl From<Property> for Item {
    fn from(property: Property) -> Self {
        Item::Property(property)
    }
}
