//! Item store: the path-keyed index behind a session
//!
//! The store is the single source of truth for the tree. Children are never
//! stored on their parent; they are derived by scanning for keys whose parent
//! path matches. Every item also has an identity entry mapping its `ItemId`
//! to its current key, and the two are kept in agreement by every mutation.

use crate::error::RepositoryError;
use crate::item::ItemId;
use crate::path;
use crate::value::PropertyValue;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use tracing::{debug, trace};

/// What is stored at a path
#[derive(Debug, Clone)]
pub(crate) enum ItemData {
    Node,
    Property(PropertyValue),
}

/// A stored item: its identity and its data
#[derive(Debug, Clone)]
pub(crate) struct ItemRecord {
    pub(crate) id: ItemId,
    pub(crate) data: ItemData,
}

impl ItemRecord {
    pub(crate) fn is_node(&self) -> bool {
        matches!(self.data, ItemData::Node)
    }
}

/// Path-addressed item index with pending-change tracking
#[derive(Debug)]
pub(crate) struct ItemStore {
    /// Absolute path -> record, in insertion order
    items: IndexMap<String, ItemRecord>,
    /// ItemId -> current path (last path for removed items)
    ///
    /// Entries are never dropped, so stale handles can still report where
    /// they were; the map grows with every item ever created.
    paths: HashMap<ItemId, String>,
    /// Paths added since the last save
    added: IndexSet<String>,
    /// Paths changed since the last save (never overlaps `added`)
    changed: IndexSet<String>,
    root: ItemId,
    normalize_unicode: bool,
}

impl ItemStore {
    /// Create a store holding only the root node, with no pending changes.
    pub(crate) fn new(normalize_unicode: bool) -> Self {
        let root = ItemId::generate();
        let mut items = IndexMap::new();
        items.insert(
            path::ROOT.to_string(),
            ItemRecord {
                id: root,
                data: ItemData::Node,
            },
        );
        let mut paths = HashMap::new();
        paths.insert(root, path::ROOT.to_string());
        Self {
            items,
            paths,
            added: IndexSet::new(),
            changed: IndexSet::new(),
            root,
            normalize_unicode,
        }
    }

    pub(crate) fn root_id(&self) -> ItemId {
        self.root
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    /// Canonical store key for a caller-supplied path.
    pub(crate) fn key(&self, path: &str) -> String {
        if self.normalize_unicode {
            path::normalize(path)
        } else {
            path::strip_trailing_separator(path).to_string()
        }
    }

    pub(crate) fn get(&self, path: &str) -> Option<&ItemRecord> {
        self.items.get(&self.key(path))
    }

    pub(crate) fn node_exists(&self, path: &str) -> bool {
        self.get(path).is_some_and(ItemRecord::is_node)
    }

    /// Path an item reports for itself. Removed items keep their last path.
    pub(crate) fn path_of(&self, id: ItemId) -> Option<&str> {
        self.paths.get(&id).map(String::as_str)
    }

    /// Current key of a live item.
    pub(crate) fn live_path(&self, id: ItemId) -> Result<String, RepositoryError> {
        match self.paths.get(&id) {
            Some(p) if self.items.get(p).map(|r| r.id) == Some(id) => Ok(p.clone()),
            Some(p) => Err(RepositoryError::ItemNotFound(format!(
                "{} has been removed",
                p
            ))),
            None => Err(RepositoryError::ItemNotFound(format!("unknown item {}", id))),
        }
    }

    pub(crate) fn is_live(&self, id: ItemId) -> bool {
        self.live_path(id).is_ok()
    }

    pub(crate) fn record(&self, id: ItemId) -> Result<&ItemRecord, RepositoryError> {
        let key = self.live_path(id)?;
        self.items
            .get(&key)
            .ok_or(RepositoryError::ItemNotFound(key))
    }

    fn require_parent_node(&self, key: &str) -> Result<(), RepositoryError> {
        let parent = path::parent(key);
        match self.items.get(&parent) {
            Some(record) if record.is_node() => Ok(()),
            Some(_) => Err(RepositoryError::PathNotFound(format!(
                "{} (parent {} is a property)",
                key, parent
            ))),
            None => Err(RepositoryError::PathNotFound(format!(
                "{} (parent {} does not exist)",
                key, parent
            ))),
        }
    }

    /// Insert a new item and record it as added.
    pub(crate) fn add(&mut self, path: &str, data: ItemData) -> Result<ItemId, RepositoryError> {
        let key = self.key(path);
        if !path::is_absolute(&key) {
            return Err(RepositoryError::InvalidPath(format!(
                "'{}' is not an absolute path",
                path
            )));
        }
        if self.items.contains_key(&key) {
            return Err(RepositoryError::AlreadyExists(key));
        }
        self.require_parent_node(&key)?;

        let id = ItemId::generate();
        self.items.insert(key.clone(), ItemRecord { id, data });
        self.paths.insert(id, key.clone());
        trace!(path = %key, "Item added");
        self.added.insert(key);
        Ok(id)
    }

    /// Record `key` as changed unless it was added in this generation.
    pub(crate) fn mark_changed(&mut self, key: &str) {
        if !self.added.contains(key) && self.changed.insert(key.to_string()) {
            trace!(path = %key, "Item changed");
        }
    }

    /// Replace the value of the property at `path`, or create it.
    pub(crate) fn set_property(
        &mut self,
        path: &str,
        value: PropertyValue,
    ) -> Result<ItemId, RepositoryError> {
        let key = self.key(path);
        match self.items.get(&key).map(|r| (r.id, r.is_node())) {
            Some((_, true)) => Err(RepositoryError::AlreadyExists(format!(
                "{} is a node",
                key
            ))),
            Some((id, false)) => {
                if let Some(record) = self.items.get_mut(&key) {
                    record.data = ItemData::Property(value);
                }
                self.mark_changed(&key);
                Ok(id)
            }
            None => self.add(&key, ItemData::Property(value)),
        }
    }

    /// Replace the value of a live property identified by `id`.
    pub(crate) fn replace_value(
        &mut self,
        id: ItemId,
        value: PropertyValue,
    ) -> Result<(), RepositoryError> {
        let key = self.live_path(id)?;
        match self.items.get_mut(&key) {
            Some(record) if !record.is_node() => {
                record.data = ItemData::Property(value);
            }
            _ => {
                return Err(RepositoryError::ValueFormat(format!(
                    "{} is not a property",
                    key
                )))
            }
        }
        self.mark_changed(&key);
        Ok(())
    }

    /// Remove the item at `path` and every descendant; the parent is marked changed.
    ///
    /// Returns the number of removed items.
    pub(crate) fn remove(&mut self, path: &str) -> Result<usize, RepositoryError> {
        let key = self.key(path);
        if !self.items.contains_key(&key) {
            return Err(RepositoryError::PathNotFound(key));
        }
        if path::is_root(&key) {
            return Err(RepositoryError::ItemNotFound(
                "the root node has no parent and cannot be removed".to_string(),
            ));
        }
        let parent = path::parent(&key);
        if !self.items.contains_key(&parent) {
            return Err(RepositoryError::ItemNotFound(format!(
                "no parent for {}",
                key
            )));
        }

        let before = self.items.len();
        self.items
            .retain(|k, _| !path::is_self_or_ancestor(&key, k));
        let removed = before - self.items.len();
        self.added.retain(|p| !path::is_self_or_ancestor(&key, p));
        self.changed.retain(|p| !path::is_self_or_ancestor(&key, p));
        self.mark_changed(&parent);

        debug!(path = %key, removed, "Removed subtree");
        Ok(removed)
    }

    /// Validate a move or copy of `src` to `dest`, returning their keys.
    fn check_transfer(&self, src: &str, dest: &str) -> Result<(String, String), RepositoryError> {
        let src = self.key(src);
        let dest = self.key(dest);
        if path::is_root(&src) {
            return Err(RepositoryError::InvalidPath(
                "the root node cannot be moved or copied".to_string(),
            ));
        }
        if !path::is_absolute(&src) || !path::is_absolute(&dest) {
            return Err(RepositoryError::InvalidPath(format!(
                "'{}' -> '{}' requires absolute paths",
                src, dest
            )));
        }
        let src_parent = path::parent(&src);
        if !self.node_exists(&src_parent) {
            return Err(RepositoryError::PathNotFound(src_parent));
        }
        let dest_parent = path::parent(&dest);
        if !self.node_exists(&dest_parent) {
            return Err(RepositoryError::PathNotFound(dest_parent));
        }
        if !self.items.contains_key(&src) {
            return Err(RepositoryError::PathNotFound(src));
        }
        if self.items.contains_key(&dest) {
            return Err(RepositoryError::AlreadyExists(dest));
        }
        if path::is_ancestor(&src, &dest) {
            return Err(RepositoryError::InvalidPath(format!(
                "cannot place {} beneath itself at {}",
                src, dest
            )));
        }
        Ok((src, dest))
    }

    /// Rewrite every key under `src` to live under `dest`.
    ///
    /// All checks run before anything is touched, and the rewritten key set
    /// is staged and swapped in whole. Entries keep their relative order.
    pub(crate) fn move_subtree(&mut self, src: &str, dest: &str) -> Result<usize, RepositoryError> {
        let (src, dest) = self.check_transfer(src, dest)?;

        let mut moved = Vec::new();
        let staged: IndexMap<String, ItemRecord> = std::mem::take(&mut self.items)
            .into_iter()
            .map(|(key, record)| match path::rebase(&key, &src, &dest) {
                Some(new_key) => {
                    moved.push((record.id, new_key.clone()));
                    (new_key, record)
                }
                None => (key, record),
            })
            .collect();
        self.items = staged;

        for (id, new_key) in &moved {
            self.paths.insert(*id, new_key.clone());
        }
        self.added = rebase_set(std::mem::take(&mut self.added), &src, &dest);
        self.changed = rebase_set(std::mem::take(&mut self.changed), &src, &dest);
        self.mark_changed(&path::parent(&src));
        self.mark_changed(&path::parent(&dest));

        debug!(src = %src, dest = %dest, moved = moved.len(), "Moved subtree");
        Ok(moved.len())
    }

    /// Deep-copy the subtree at `src` to `dest`; copies get fresh identities.
    pub(crate) fn copy_subtree(&mut self, src: &str, dest: &str) -> Result<usize, RepositoryError> {
        let (src, dest) = self.check_transfer(src, dest)?;

        let staged: Vec<(String, ItemRecord)> = self
            .items
            .iter()
            .filter_map(|(key, record)| {
                path::rebase(key, &src, &dest).map(|new_key| {
                    (
                        new_key,
                        ItemRecord {
                            id: ItemId::generate(),
                            data: record.data.clone(),
                        },
                    )
                })
            })
            .collect();

        let copied = staged.len();
        for (key, record) in staged {
            self.paths.insert(record.id, key.clone());
            self.items.insert(key.clone(), record);
            self.added.insert(key);
        }
        self.mark_changed(&path::parent(&dest));

        debug!(src = %src, dest = %dest, copied, "Copied subtree");
        Ok(copied)
    }

    /// Direct children of the live item `id`: (identity, is_node), in store order.
    pub(crate) fn children(&self, id: ItemId) -> Result<Vec<(ItemId, bool)>, RepositoryError> {
        let parent_key = self.live_path(id)?;
        Ok(self
            .items
            .iter()
            .filter(|(key, _)| !path::is_root(key) && path::parent(key) == parent_key)
            .map(|(_, record)| (record.id, record.is_node()))
            .collect())
    }

    /// Forget every pending change.
    pub(crate) fn save_all(&mut self) {
        let cleared = self.added.len() + self.changed.len();
        self.added.clear();
        self.changed.clear();
        debug!(cleared, "Session saved");
    }

    /// Forget pending changes at `key` and below.
    pub(crate) fn save_scoped(&mut self, key: &str) {
        self.added.retain(|p| !path::is_self_or_ancestor(key, p));
        self.changed.retain(|p| !path::is_self_or_ancestor(key, p));
        trace!(path = %key, "Subtree saved");
    }

    pub(crate) fn is_new(&self, key: &str) -> bool {
        self.added.contains(key)
    }

    pub(crate) fn is_modified(&self, key: &str) -> bool {
        self.changed.contains(key)
    }

    pub(crate) fn has_pending_changes(&self) -> bool {
        !self.added.is_empty() || !self.changed.is_empty()
    }

    /// Find the live item carrying `id`.
    pub(crate) fn find(&self, id: ItemId) -> Option<&ItemRecord> {
        self.record(id).ok()
    }

    /// Check the index invariants, describing the first violation found.
    pub(crate) fn verify(&self) -> Result<(), String> {
        for (key, record) in &self.items {
            match self.paths.get(&record.id) {
                Some(p) if p == key => {}
                other => {
                    return Err(format!(
                        "item at {} reports path {:?}",
                        key, other
                    ))
                }
            }
            if !path::is_root(key) {
                let parent = path::parent(key);
                if !self.items.get(&parent).is_some_and(ItemRecord::is_node) {
                    return Err(format!("item at {} has no parent node {}", key, parent));
                }
            }
        }
        for p in self.added.iter().chain(self.changed.iter()) {
            if !self.items.contains_key(p) {
                return Err(format!("pending path {} is not stored", p));
            }
        }
        if let Some(p) = self.added.iter().find(|p| self.changed.contains(*p)) {
            return Err(format!("{} is both added and changed", p));
        }
        Ok(())
    }
}

fn rebase_set(set: IndexSet<String>, src: &str, dest: &str) -> IndexSet<String> {
    set.into_iter()
        .map(|p| path::rebase(&p, src, dest).unwrap_or(p))
        .collect()
}
