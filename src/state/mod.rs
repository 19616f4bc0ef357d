pub mod deck;
pub mod registry;
pub mod session;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::dao::session_store::SessionStore;
use crate::state::registry::SessionRegistry;

pub use self::registry::RegistryError;

/// Shared handle to the application state.
pub type SharedState = Arc<AppState>;

/// Central application state: the session registry and runtime configuration.
pub struct AppState {
    registry: SessionRegistry,
    store: Arc<dyn SessionStore>,
    config: AppConfig,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(config: AppConfig, store: Arc<dyn SessionStore>) -> SharedState {
        Arc::new(Self {
            registry: SessionRegistry::new(store.clone()),
            store,
            config,
        })
    }

    /// The session registry coordinating all game-state access.
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Handle to the underlying record store (health checks only; all
    /// game-state access goes through the registry).
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Runtime configuration loaded at startup.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
