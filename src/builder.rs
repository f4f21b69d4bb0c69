//! Fixture Builder DSL
//!
//! Declarative construction of item trees for tests:
//!
//! ```
//! use memrepo::builder::{node, repository};
//!
//! let repository = repository()
//!     .node(
//!         node("/content")
//!             .property("title", "Home")
//!             .child(node("/content/en").property("tags", ["a", "b"])),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let session = repository.login();
//! assert!(session.node_exists("/content/en"));
//! assert!(!session.has_pending_changes());
//! ```
//!
//! Builders are walked depth-first. A node builder adds its node to the parent
//! under the basename of its own path, applies its properties and children in
//! declaration order, then saves its own subtree. [`resource`] wraps a node
//! builder and hands back the built node as a resource.

use crate::config::SessionConfig;
use crate::error::RepositoryError;
use crate::item::{Item, ItemHandle, Node, Property};
use crate::path;
use crate::repository::Repository;
use crate::resource::{Resource, ResourceResolver};
use crate::session::Session;
use crate::value::PropertyValue;
use tracing::{debug, instrument};

/// A node or property declaration inside a node builder
#[derive(Debug, Clone)]
pub enum ItemBuilder {
    Node(NodeBuilder),
    Property(PropertyBuilder),
}

impl ItemBuilder {
    fn build(&self, parent: &Node) -> Result<(), RepositoryError> {
        match self {
            ItemBuilder::Node(builder) => builder.build(Some(parent)).map(|_| ()),
            ItemBuilder::Property(builder) => builder.build(Some(parent)).map(|_| ()),
        }
    }
}

impl From<NodeBuilder> for ItemBuilder {
    fn from(builder: NodeBuilder) -> Self {
        ItemBuilder::Node(builder)
    }
}

impl From<PropertyBuilder> for ItemBuilder {
    fn from(builder: PropertyBuilder) -> Self {
        ItemBuilder::Property(builder)
    }
}

/// Declares a node: its path, an optional primary type, and its children
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    path: String,
    node_type: Option<String>,
    items: Vec<ItemBuilder>,
}

/// Declare a node with the session's default primary type.
pub fn node(path: &str) -> NodeBuilder {
    NodeBuilder {
        path: path.to_string(),
        node_type: None,
        items: Vec::new(),
    }
}

/// Declare a node with an explicit primary type.
pub fn typed_node(path: &str, node_type: &str) -> NodeBuilder {
    node(path).of_type(node_type)
}

impl NodeBuilder {
    pub fn of_type(mut self, node_type: &str) -> Self {
        self.node_type = Some(node_type.to_string());
        self
    }

    pub fn property(self, name: &str, value: impl Into<PropertyValue>) -> Self {
        self.with(property(name, value))
    }

    pub fn child(self, child: NodeBuilder) -> Self {
        self.with(child)
    }

    pub fn with(mut self, item: impl Into<ItemBuilder>) -> Self {
        self.items.push(item.into());
        self
    }

    pub fn with_all<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ItemBuilder>,
    {
        self.items.extend(items.into_iter().map(Into::into));
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Name the node is created under: the basename of its path.
    pub fn name(&self) -> Result<&str, RepositoryError> {
        let name = path::basename(&self.path);
        if name.is_empty() {
            return Err(RepositoryError::InvalidPath(format!(
                "'{}' has no name to create a node under",
                self.path
            )));
        }
        Ok(name)
    }

    /// Build this node under `parent`, or under the root of a fresh repository.
    ///
    /// Only the basename of the declared path is used: `node("/a/b").build(None)`
    /// creates `/b`, and under a parent `/p` it creates `/p/b`.
    #[instrument(skip(self, parent), fields(path = %self.path))]
    pub fn build(&self, parent: Option<&Node>) -> Result<Node, RepositoryError> {
        match parent {
            Some(parent) => self.build_under(parent),
            None => self.build_in(&Repository::new().login()),
        }
    }

    /// Build this node directly under the root of `session`.
    pub fn build_in(&self, session: &Session) -> Result<Node, RepositoryError> {
        self.build_under(&session.root_node())
    }

    fn build_under(&self, parent: &Node) -> Result<Node, RepositoryError> {
        let node_type = match &self.node_type {
            Some(node_type) => node_type.clone(),
            None => parent.session().config().default_node_type.clone(),
        };
        let node = parent.add_node_with_type(self.name()?, &node_type)?;
        for item in &self.items {
            item.build(&node)?;
        }
        node.save()?;
        debug!(path = %node.path(), items = self.items.len(), "Built node");
        Ok(node)
    }
}

/// Declares a property on the enclosing node
#[derive(Debug, Clone)]
pub struct PropertyBuilder {
    name: String,
    value: PropertyValue,
}

/// Declare a property; arrays and `Vec`s always produce multi-valued properties.
pub fn property(name: &str, value: impl Into<PropertyValue>) -> PropertyBuilder {
    PropertyBuilder {
        name: name.to_string(),
        value: value.into(),
    }
}

impl PropertyBuilder {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &PropertyValue {
        &self.value
    }

    /// Set the property on `parent`; without a parent there is nothing to do.
    pub fn build(&self, parent: Option<&Node>) -> Result<Option<Property>, RepositoryError> {
        match parent {
            Some(parent) => parent.set_property(&self.name, self.value.clone()).map(Some),
            None => Ok(None),
        }
    }
}

/// Declares a resource backed by the node a node builder creates
#[derive(Debug, Clone)]
pub struct ResourceBuilder {
    node: NodeBuilder,
}

pub fn resource(node: NodeBuilder) -> ResourceBuilder {
    ResourceBuilder { node }
}

impl ResourceBuilder {
    /// Build the node in a fresh repository and view it as a resource.
    #[instrument(skip(self), fields(path = %self.node.path))]
    pub fn build(&self) -> Result<Resource, RepositoryError> {
        self.build_in(&Repository::new().resource_resolver())
    }

    /// Build the node under the root of `resolver`'s session.
    pub fn build_in(&self, resolver: &ResourceResolver) -> Result<Resource, RepositoryError> {
        let node = self.node.build_in(resolver.session())?;
        Ok(Resource::new(resolver.clone(), Item::Node(node)))
    }
}

/// Declares a repository as a list of top-level nodes
#[derive(Debug, Clone, Default)]
pub struct RepositoryBuilder {
    nodes: Vec<NodeBuilder>,
    config: Option<SessionConfig>,
}

pub fn repository() -> RepositoryBuilder {
    RepositoryBuilder::default()
}

impl RepositoryBuilder {
    pub fn node(mut self, node: NodeBuilder) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn nodes(mut self, nodes: impl IntoIterator<Item = NodeBuilder>) -> Self {
        self.nodes.extend(nodes);
        self
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build a fresh repository, create every declared node under its root,
    /// then save the whole session.
    #[instrument(skip(self), fields(nodes = self.nodes.len()))]
    pub fn build(&self) -> Result<Repository, RepositoryError> {
        let repository = match &self.config {
            Some(config) => Repository::with_config(config),
            None => Repository::new(),
        };
        let session = repository.login();
        let root = session.root_node();
        for node in &self.nodes {
            node.build(Some(&root))?;
        }
        session.save()?;
        debug!(items = session.item_count(), "Repository built");
        Ok(repository)
    }
}
