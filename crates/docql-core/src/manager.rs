//! Storage collaborator contract.
//!
//! The core never touches storage. Finalized queries and entities are handed
//! to a [`Manager`], and whatever it returns, errors included, is passed back
//! to the caller unchanged.

use crate::entity::DocumentEntity;
use crate::error::Result;
use crate::query::{DeleteQuery, SelectQuery};
use std::time::Duration;

/// Lazy sequence of entities produced by a manager.
pub type EntityStream<'a> = Box<dyn Iterator<Item = DocumentEntity> + 'a>;

/// A storage engine able to execute docql query objects.
pub trait Manager {
    fn select<'a>(&'a self, query: &SelectQuery) -> Result<EntityStream<'a>>;

    fn delete(&self, query: &DeleteQuery) -> Result<()>;

    fn insert(&self, entity: DocumentEntity) -> Result<DocumentEntity>;

    /// Insert an entity that expires after `ttl`.
    fn insert_with_ttl(&self, entity: DocumentEntity, ttl: Duration) -> Result<DocumentEntity>;

    fn update(&self, entity: DocumentEntity) -> Result<DocumentEntity>;

    fn count(&self, name: &str) -> Result<u64>;
}
