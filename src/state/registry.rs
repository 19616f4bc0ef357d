//! Session registry: per-session serialization and write-through persistence.
//!
//! Every mutating operation goes through [`SessionRegistry::update`], which
//! locks the session's own mutex, runs the transition on a draft copy,
//! persists the aggregate, and only then publishes the draft. Operations on
//! different sessions never contend with each other.

use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::dao::models::{SessionListItemEntity, SessionRecord};
use crate::dao::session_store::SessionStore;
use crate::dao::storage::StorageError;
use crate::state::session::{Session, SessionError, SessionPhase};

/// Failure of a registry-level operation.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No session exists under the given id.
    #[error("session `{0}` not found")]
    NotFound(Uuid),
    /// The session rejected the transition.
    #[error(transparent)]
    Session(#[from] SessionError),
    /// The record store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Mapping from session id to its live aggregate, one lock per session.
pub struct SessionRegistry {
    sessions: DashMap<Uuid, Arc<Mutex<Session>>>,
    store: Arc<dyn SessionStore>,
}

impl SessionRegistry {
    /// Create a registry persisting through the given store.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            sessions: DashMap::new(),
            store,
        }
    }

    /// Create and persist a new session, making it available for lookup.
    pub async fn create(
        &self,
        name: &str,
        host_id: Uuid,
        max_players: usize,
        name_max_len: usize,
    ) -> Result<Session, RegistryError> {
        let session = Session::create(name, host_id, max_players, name_max_len)?;
        self.store.save(SessionRecord::from(&session)).await?;

        debug!(session_id = %session.id, %host_id, "session created");
        self.sessions
            .insert(session.id, Arc::new(Mutex::new(session.clone())));
        Ok(session)
    }

    /// Run a read-only closure against the session under its lock.
    pub async fn read<F, T>(&self, id: Uuid, f: F) -> Result<T, RegistryError>
    where
        F: FnOnce(&Session) -> Result<T, SessionError>,
    {
        let handle = self.entry(id).await?;
        let session = handle.lock().await;
        Ok(f(&session)?)
    }

    /// Run a state transition against the session under its lock.
    ///
    /// The closure operates on a draft copy; the live aggregate is replaced
    /// only after the transition succeeded *and* the store accepted the new
    /// record, so callers never observe a partially applied operation.
    pub async fn update<F, T>(&self, id: Uuid, f: F) -> Result<T, RegistryError>
    where
        F: FnOnce(&mut Session) -> Result<T, SessionError>,
    {
        let handle = self.entry(id).await?;
        let mut session = handle.lock().await;

        let mut draft = session.clone();
        let value = f(&mut draft)?;
        self.store.save(SessionRecord::from(&draft)).await?;

        *session = draft;
        Ok(value)
    }

    /// All sessions currently open for players to join, newest first.
    pub async fn list_waiting(&self) -> Result<Vec<SessionListItemEntity>, RegistryError> {
        let items = self.store.list().await?;
        Ok(items
            .into_iter()
            .filter(|item| item.phase == SessionPhase::Waiting)
            .collect())
    }

    /// All sessions where the player is host or member, newest first.
    pub async fn list_for(&self, player_id: Uuid) -> Result<Vec<SessionListItemEntity>, RegistryError> {
        let items = self.store.list().await?;
        Ok(items
            .into_iter()
            .filter(|item| item.host_id == player_id || item.player_ids.contains(&player_id))
            .collect())
    }

    /// Look up the live handle, loading the aggregate from the store on miss.
    async fn entry(&self, id: Uuid) -> Result<Arc<Mutex<Session>>, RegistryError> {
        if let Some(handle) = self.sessions.get(&id) {
            return Ok(handle.clone());
        }

        let record = self
            .store
            .find(id)
            .await?
            .ok_or(RegistryError::NotFound(id))?;

        // A concurrent lookup may have raced us here; keep whichever handle
        // landed in the map first so both callers share one lock.
        let handle = self
            .sessions
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(Session::from(record))))
            .clone();
        Ok(handle)
    }
}
