//! Resource view over a session
//!
//! A resource is a node or property seen through a [`ResourceResolver`]: it
//! has a path, a name, a resource type and, for nodes, child resources. The
//! typed [`ResourceView`] replaces runtime adaptation: nodes read as a
//! [`ValueMap`] of their properties, properties as their stored value.
//!
//! Writes made through a resolver go straight to its session and are kept
//! with [`ResourceResolver::commit`].

use crate::error::RepositoryError;
use crate::item::{Item, ItemHandle, Node, Property};
use crate::iter::RangeIter;
use crate::path;
use crate::session::Session;
use crate::value::{PropertyValue, Value};
use indexmap::IndexMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Property overriding a node's primary type as its resource type
pub const RESOURCE_TYPE: &str = "sling:resourceType";

/// Resolves paths to resources and applies resource-level writes
#[derive(Clone, Debug)]
pub struct ResourceResolver {
    session: Session,
    live: Arc<AtomicBool>,
}

impl ResourceResolver {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Resource at the absolute `path`, if an item is stored there.
    pub fn get_resource(&self, path: &str) -> Option<Resource> {
        self.session
            .get_item(path)
            .ok()
            .map(|item| Resource::new(self.clone(), item))
    }

    /// Resource at `relative` to `base`, or to the root when there is no base.
    pub fn get_resource_from(&self, base: Option<&Resource>, relative: &str) -> Option<Resource> {
        let base_path = base
            .map(Resource::path)
            .unwrap_or_else(|| path::ROOT.to_string());
        self.get_resource(&path::resolve(&base_path, relative))
    }

    pub fn list_children(&self, parent: &Resource) -> RangeIter<Resource> {
        parent.children()
    }

    pub fn has_children(&self, resource: &Resource) -> bool {
        resource.has_children()
    }

    /// Resources for the nodes a seeded query answers with.
    pub fn find_resources(&self, statement: &str, language: &str) -> RangeIter<Resource> {
        self.session
            .workspace()
            .query_manager()
            .create_query(statement, language)
            .execute()
            .nodes()
            .map(|node| Resource::new(self.clone(), Item::Node(node)))
            .collect()
    }

    /// Create a node resource named `name` under `parent` with `properties`.
    ///
    /// An existing node at that name is returned unchanged.
    pub fn create<I, K, V>(
        &self,
        parent: &Resource,
        name: &str,
        properties: I,
    ) -> Result<Resource, RepositoryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<PropertyValue>,
    {
        let parent_node = parent.node().ok_or_else(|| {
            RepositoryError::TypeMismatch(format!(
                "{} is a property; resources are created under nodes",
                parent.path()
            ))
        })?;
        if let Ok(existing) = parent_node.node(name) {
            return Ok(Resource::new(self.clone(), Item::Node(existing)));
        }
        let node = parent_node.add_node(name)?;
        for (key, value) in properties {
            node.set_property(key.as_ref(), value)?;
        }
        debug!(path = %node.path(), "Resource created");
        Ok(Resource::new(self.clone(), Item::Node(node)))
    }

    /// Remove the item behind `resource` and everything beneath it.
    pub fn delete(&self, resource: &Resource) -> Result<(), RepositoryError> {
        resource.item.remove()?;
        debug!(path = %resource.path(), "Resource deleted");
        Ok(())
    }

    pub fn commit(&self) -> Result<(), RepositoryError> {
        self.session.save()
    }

    pub fn has_changes(&self) -> bool {
        self.session.has_pending_changes()
    }

    /// The store keeps no prior state to return to.
    pub fn revert(&self) -> Result<(), RepositoryError> {
        Err(RepositoryError::unsupported("revert"))
    }

    pub fn parent_resource_type(&self, resource: &Resource) -> Option<String> {
        resource.parent().and_then(|parent| parent.resource_type())
    }

    pub fn is_resource_type(&self, resource: &Resource, resource_type: &str) -> bool {
        resource.is_resource_type(resource_type)
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Mark this resolver, and every clone of it, as closed.
    pub fn close(&self) {
        self.live.store(false, Ordering::Release);
        debug!("Resource resolver closed");
    }
}

/// A node or property reached through a resolver
#[derive(Clone, Debug)]
pub struct Resource {
    resolver: ResourceResolver,
    item: Item,
}

impl Resource {
    pub(crate) fn new(resolver: ResourceResolver, item: Item) -> Self {
        Self { resolver, item }
    }

    pub fn path(&self) -> String {
        self.item.path()
    }

    pub fn name(&self) -> String {
        self.item.name()
    }

    pub fn resolver(&self) -> &ResourceResolver {
        &self.resolver
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn node(&self) -> Option<&Node> {
        self.item.as_node()
    }

    pub fn property(&self) -> Option<&Property> {
        self.item.as_property()
    }

    /// The enclosing node's resource; `None` for the root.
    pub fn parent(&self) -> Option<Resource> {
        self.item
            .parent()
            .ok()
            .map(|node| Resource::new(self.resolver.clone(), Item::Node(node)))
    }

    /// Node or property at `relative` beneath this node.
    pub fn child(&self, relative: &str) -> Option<Resource> {
        if relative.is_empty() || self.node().is_none() {
            return None;
        }
        self.resolver.get_resource_from(Some(self), relative)
    }

    /// Child node resources; properties have none.
    pub fn children(&self) -> RangeIter<Resource> {
        let Some(node) = self.node() else {
            return RangeIter::empty();
        };
        match node.nodes() {
            Ok(nodes) => nodes
                .map(|child| Resource::new(self.resolver.clone(), Item::Node(child)))
                .collect(),
            Err(_) => RangeIter::empty(),
        }
    }

    pub fn has_children(&self) -> bool {
        self.node().is_some_and(Node::has_nodes)
    }

    /// `sling:resourceType` or the primary type for nodes; the parent's
    /// resource type joined with the property name for properties.
    pub fn resource_type(&self) -> Option<String> {
        match &self.item {
            Item::Node(node) => Some(node_resource_type(node)),
            Item::Property(property) => {
                let parent = property.parent().ok()?;
                Some(format!(
                    "{}/{}",
                    node_resource_type(&parent),
                    property.name()
                ))
            }
        }
    }

    pub fn is_resource_type(&self, resource_type: &str) -> bool {
        self.resource_type().as_deref() == Some(resource_type)
    }

    pub fn view(&self) -> Result<ResourceView, RepositoryError> {
        match &self.item {
            Item::Node(node) => Ok(ResourceView::Node(ValueMap::of(node)?)),
            Item::Property(property) => Ok(ResourceView::Property(property.content()?)),
        }
    }

    /// Properties of a node resource by name.
    pub fn value_map(&self) -> Option<ValueMap> {
        match self.view().ok()? {
            ResourceView::Node(map) => Some(map),
            ResourceView::Property(_) => None,
        }
    }
}

fn node_resource_type(node: &Node) -> String {
    node.property(RESOURCE_TYPE)
        .and_then(|p| p.get_string())
        .unwrap_or_else(|_| node.primary_type())
}

/// What a resource reads as
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceView {
    Node(ValueMap),
    Property(PropertyValue),
}

/// A snapshot of a node's properties, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMap {
    entries: IndexMap<String, PropertyValue>,
}

impl ValueMap {
    fn of(node: &Node) -> Result<Self, RepositoryError> {
        let entries = node
            .properties()?
            .map(|property| -> Result<(String, PropertyValue), RepositoryError> {
                Ok((property.name(), property.content()?))
            })
            .collect::<Result<IndexMap<_, _>, _>>()?;
        Ok(Self { entries })
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.entries.get(name)
    }

    /// Single value stored under `name`.
    pub fn get_value(&self, name: &str) -> Option<&Value> {
        match self.entries.get(name)? {
            PropertyValue::Single(value) => Some(value),
            PropertyValue::Multiple(_) => None,
        }
    }

    pub fn get_string(&self, name: &str) -> Option<String> {
        self.get_value(name).map(Value::get_string)
    }

    pub fn get_long(&self, name: &str) -> Option<i64> {
        self.get_value(name)?.get_long().ok()
    }

    pub fn get_boolean(&self, name: &str) -> Option<bool> {
        self.get_value(name)?.get_boolean().ok()
    }

    /// Every value under `name` as text; a single value yields one entry.
    pub fn get_strings(&self, name: &str) -> Option<Vec<String>> {
        match self.entries.get(name)? {
            PropertyValue::Single(value) => Some(vec![value.get_string()]),
            PropertyValue::Multiple(values) => Some(values.iter().map(Value::get_string).collect()),
        }
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
