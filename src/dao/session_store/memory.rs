//! In-process [`SessionStore`] backend keeping records as encoded JSON.
//!
//! Records are held in their serialized form so the aggregate crosses the
//! same encode/decode boundary a remote record store would impose.

use dashmap::DashMap;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::sync::Arc;
use uuid::Uuid;

use crate::dao::models::{SessionListItemEntity, SessionRecord};
use crate::dao::session_store::SessionStore;
use crate::dao::storage::{StorageError, StorageResult};

/// Session store backed by an in-memory map of JSON documents.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    documents: Arc<DashMap<Uuid, String>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn decode(id: Uuid, document: &str) -> StorageResult<SessionRecord> {
        serde_json::from_str(document).map_err(|err| StorageError::corrupted(id, err))
    }
}

impl SessionStore for MemorySessionStore {
    fn save(&self, record: SessionRecord) -> BoxFuture<'static, StorageResult<()>> {
        let documents = Arc::clone(&self.documents);
        async move {
            let id = record.session.id;
            let document = serde_json::to_string(&record)
                .map_err(|err| StorageError::unavailable("failed to encode record".into(), err))?;
            documents.insert(id, document);
            Ok(())
        }
        .boxed()
    }

    fn find(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<SessionRecord>>> {
        let documents = Arc::clone(&self.documents);
        async move {
            documents
                .get(&id)
                .map(|document| Self::decode(id, document.value()))
                .transpose()
        }
        .boxed()
    }

    fn list(&self) -> BoxFuture<'static, StorageResult<Vec<SessionListItemEntity>>> {
        let documents = Arc::clone(&self.documents);
        async move {
            let mut items = Vec::with_capacity(documents.len());
            for entry in documents.iter() {
                let record = Self::decode(*entry.key(), entry.value())?;
                items.push(SessionListItemEntity::from(&record));
            }
            // Newest sessions first, matching the lobby listing order.
            items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(items)
        }
        .boxed()
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        async { Ok(()) }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;
    use crate::dao::models::{MembershipEntity, SessionEntity};
    use crate::state::session::SessionPhase;

    fn sample_record(name: &str) -> SessionRecord {
        let session_id = Uuid::new_v4();
        SessionRecord {
            session: SessionEntity {
                id: session_id,
                name: name.into(),
                host_id: Uuid::new_v4(),
                phase: SessionPhase::Waiting,
                max_players: 4,
                winner_id: None,
                current_card: None,
                called_cards: Vec::new(),
                created_at: SystemTime::now(),
                updated_at: SystemTime::now(),
            },
            memberships: vec![MembershipEntity {
                session_id,
                player_id: Uuid::new_v4(),
                board: (1..=16).collect(),
                marks: vec![0, 3],
                joined_at: SystemTime::now(),
            }],
        }
    }

    #[tokio::test]
    async fn save_then_find_round_trips_the_aggregate() {
        let store = MemorySessionStore::new();
        let record = sample_record("sala uno");

        store.save(record.clone()).await.unwrap();
        let loaded = store.find(record.session.id).await.unwrap().unwrap();
        assert_eq!(loaded, record);
    }

    #[tokio::test]
    async fn find_unknown_id_is_none() {
        let store = MemorySessionStore::new();
        assert!(store.find(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_projects_members_and_phase() {
        let store = MemorySessionStore::new();
        let record = sample_record("sala dos");
        store.save(record.clone()).await.unwrap();

        let items = store.list().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, record.session.id);
        assert_eq!(items[0].phase, SessionPhase::Waiting);
        assert_eq!(items[0].player_ids, vec![record.memberships[0].player_id]);
    }
}
