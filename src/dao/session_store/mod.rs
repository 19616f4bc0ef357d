pub mod memory;

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::models::{SessionListItemEntity, SessionRecord};
use crate::dao::storage::StorageResult;

/// Abstraction over the persistence layer for session aggregates.
///
/// Implementations must apply `save` atomically for a single aggregate; the
/// registry serializes writers per session, so no cross-aggregate transaction
/// is required.
pub trait SessionStore: Send + Sync {
    /// Insert or replace a whole session aggregate.
    fn save(&self, record: SessionRecord) -> BoxFuture<'static, StorageResult<()>>;
    /// Load a session aggregate by id.
    fn find(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<SessionRecord>>>;
    /// Enumerate listing projections of every stored session.
    fn list(&self) -> BoxFuture<'static, StorageResult<Vec<SessionListItemEntity>>>;
    /// Verify the backend is reachable.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
