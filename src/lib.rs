//! memrepo: In-Memory Content Repository
//!
//! A path-addressed, hierarchical item store with change tracking, plus a
//! declarative builder DSL for materializing fixture trees in tests, and a
//! resource view over the same tree.

pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod fixture;
pub mod item;
pub mod iter;
pub mod logging;
pub mod path;
pub mod query;
pub mod repository;
pub mod resource;
pub mod session;
pub mod value;

pub use builder::{node, property, repository, resource, typed_node};
pub use error::{ApiError, RepositoryError};
pub use item::{Item, ItemHandle, ItemId, Node, Property};
pub use iter::RangeIter;
pub use repository::{Repository, Workspace};
pub use resource::{Resource, ResourceResolver, ResourceView, ValueMap};
pub use session::Session;
pub use value::{Binary, Decimal, PropertyValue, Value, ValueType};
