use super::{ItemHandle, ItemId, Property, PRIMARY_TYPE};
use crate::error::RepositoryError;
use crate::iter::RangeIter;
use crate::path;
use crate::session::store::ItemData;
use crate::session::Session;
use crate::value::{Binary, Decimal, PropertyValue, Value};
use chrono::{DateTime, FixedOffset};
use std::fmt;

/// Handle to a node in a session
#[derive(Clone)]
pub struct Node {
    session: Session,
    id: ItemId,
}

impl Node {
    pub(crate) fn new(session: Session, id: ItemId) -> Self {
        Self { session, id }
    }

    /// Stable identifier, usable with `Session::node_by_identifier`.
    pub fn identifier(&self) -> String {
        self.id.to_string()
    }

    /// Same-name siblings are not supported, so every node has index 1.
    pub fn index(&self) -> usize {
        1
    }

    /// Add a child at `relative` with the session's default primary type.
    pub fn add_node(&self, relative: &str) -> Result<Node, RepositoryError> {
        let node_type = self.session.config().default_node_type.clone();
        self.add_node_with_type(relative, &node_type)
    }

    /// Add a child at `relative`; an empty `node_type` records no primary type.
    pub fn add_node_with_type(
        &self,
        relative: &str,
        node_type: &str,
    ) -> Result<Node, RepositoryError> {
        let mut store = self.session.write();
        let base = store.live_path(self.id)?;
        let id = store.add(&join(&base, relative)?, ItemData::Node)?;
        if !node_type.is_empty() {
            let node_path = store.live_path(id)?;
            store.add(
                &path::resolve(&node_path, PRIMARY_TYPE),
                ItemData::Property(Value::from(node_type).into()),
            )?;
        }
        store.mark_changed(&base);
        Ok(Node::new(self.session.clone(), id))
    }

    /// Node at `relative` to this one.
    pub fn node(&self, relative: &str) -> Result<Node, RepositoryError> {
        self.session.get_node(&self.resolve(relative)?)
    }

    /// Property at `relative` to this one.
    pub fn property(&self, relative: &str) -> Result<Property, RepositoryError> {
        self.session.get_property(&self.resolve(relative)?)
    }

    pub fn has_node(&self, relative: &str) -> bool {
        self.resolve(relative)
            .map(|p| self.session.node_exists(&p))
            .unwrap_or(false)
    }

    pub fn has_property(&self, relative: &str) -> bool {
        self.resolve(relative)
            .map(|p| self.session.property_exists(&p))
            .unwrap_or(false)
    }

    pub fn has_nodes(&self) -> bool {
        self.children()
            .map(|c| c.iter().any(|(_, is_node)| *is_node))
            .unwrap_or(false)
    }

    pub fn has_properties(&self) -> bool {
        self.children()
            .map(|c| c.iter().any(|(_, is_node)| !*is_node))
            .unwrap_or(false)
    }

    /// Child nodes in insertion order.
    pub fn nodes(&self) -> Result<RangeIter<Node>, RepositoryError> {
        Ok(self
            .children()?
            .into_iter()
            .filter(|(_, is_node)| *is_node)
            .map(|(id, _)| Node::new(self.session.clone(), id))
            .collect())
    }

    /// Properties in insertion order.
    pub fn properties(&self) -> Result<RangeIter<Property>, RepositoryError> {
        Ok(self
            .children()?
            .into_iter()
            .filter(|(_, is_node)| !*is_node)
            .map(|(id, _)| Property::new(self.session.clone(), id))
            .collect())
    }

    /// Set a property, creating it if needed.
    pub fn set_property(
        &self,
        name: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<Property, RepositoryError> {
        let value = value.into();
        let mut store = self.session.write();
        let base = store.live_path(self.id)?;
        let id = store.set_property(&join(&base, name)?, value)?;
        store.mark_changed(&base);
        Ok(Property::new(self.session.clone(), id))
    }

    /// Set a property, or remove it when `value` is `None`.
    pub fn set_property_opt<V: Into<PropertyValue>>(
        &self,
        name: &str,
        value: Option<V>,
    ) -> Result<Option<Property>, RepositoryError> {
        match value {
            Some(value) => self.set_property(name, value).map(Some),
            None => {
                if self.has_property(name) {
                    self.remove_property(name)?;
                }
                Ok(None)
            }
        }
    }

    pub fn remove_property(&self, name: &str) -> Result<(), RepositoryError> {
        let mut store = self.session.write();
        let base = store.live_path(self.id)?;
        let target = join(&base, name)?;
        match store.get(&target).map(|r| r.is_node()) {
            Some(false) => store.remove(&target).map(|_| ()),
            Some(true) => Err(RepositoryError::TypeMismatch(format!(
                "{} is a node, not a property",
                target
            ))),
            None => Err(RepositoryError::PathNotFound(target)),
        }
    }

    pub fn set_string(&self, name: &str, value: &str) -> Result<Property, RepositoryError> {
        self.set_property(name, value)
    }

    pub fn set_strings(&self, name: &str, values: &[&str]) -> Result<Property, RepositoryError> {
        self.set_property(name, values.to_vec())
    }

    pub fn set_long(&self, name: &str, value: i64) -> Result<Property, RepositoryError> {
        self.set_property(name, value)
    }

    pub fn set_double(&self, name: &str, value: f64) -> Result<Property, RepositoryError> {
        self.set_property(name, value)
    }

    pub fn set_decimal(&self, name: &str, value: Decimal) -> Result<Property, RepositoryError> {
        self.set_property(name, value)
    }

    pub fn set_boolean(&self, name: &str, value: bool) -> Result<Property, RepositoryError> {
        self.set_property(name, value)
    }

    pub fn set_date(
        &self,
        name: &str,
        value: DateTime<FixedOffset>,
    ) -> Result<Property, RepositoryError> {
        self.set_property(name, value)
    }

    pub fn set_binary(
        &self,
        name: &str,
        value: impl Into<Binary>,
    ) -> Result<Property, RepositoryError> {
        self.set_property(name, value.into())
    }

    /// Recorded primary type, or the session's default type when none is recorded.
    pub fn primary_type(&self) -> String {
        self.property(PRIMARY_TYPE)
            .and_then(|p| p.get_string())
            .unwrap_or_else(|_| self.session.config().default_node_type.clone())
    }

    pub fn set_primary_type(&self, node_type: &str) -> Result<(), RepositoryError> {
        self.set_property(PRIMARY_TYPE, node_type).map(|_| ())
    }

    /// Exact primary type match; there is no type hierarchy.
    pub fn is_node_type(&self, node_type: &str) -> bool {
        self.primary_type() == node_type
    }

    pub fn order_before(&self, _src: &str, _dest: Option<&str>) -> Result<(), RepositoryError> {
        Err(RepositoryError::unsupported("order_before"))
    }

    pub fn add_mixin(&self, _mixin: &str) -> Result<(), RepositoryError> {
        Err(RepositoryError::unsupported("add_mixin"))
    }

    pub fn lock(&self, _deep: bool) -> Result<(), RepositoryError> {
        Err(RepositoryError::unsupported("lock"))
    }

    pub fn unlock(&self) -> Result<(), RepositoryError> {
        Err(RepositoryError::unsupported("unlock"))
    }

    pub fn checkin(&self) -> Result<(), RepositoryError> {
        Err(RepositoryError::unsupported("checkin"))
    }

    pub fn checkout(&self) -> Result<(), RepositoryError> {
        Err(RepositoryError::unsupported("checkout"))
    }

    pub fn nodes_matching(&self, _pattern: &str) -> Result<RangeIter<Node>, RepositoryError> {
        Err(RepositoryError::unsupported("nodes_matching"))
    }

    fn resolve(&self, relative: &str) -> Result<String, RepositoryError> {
        let base = self.session.read().live_path(self.id)?;
        join(&base, relative)
    }

    fn children(&self) -> Result<Vec<(ItemId, bool)>, RepositoryError> {
        self.session.read().children(self.id)
    }
}

/// Resolve a non-empty `relative` path against the node path `base`.
fn join(base: &str, relative: &str) -> Result<String, RepositoryError> {
    if relative.is_empty() {
        return Err(RepositoryError::InvalidPath(format!(
            "empty relative path under {}",
            base
        )));
    }
    Ok(path::resolve(base, relative))
}

impl ItemHandle for Node {
    fn session(&self) -> &Session {
        &self.session
    }

    fn id(&self) -> ItemId {
        self.id
    }

    fn is_node(&self) -> bool {
        true
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("path", &self.path())
            .finish()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.is_same(other)
    }
}
