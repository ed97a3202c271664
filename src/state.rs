//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the parsed config, the backend factory, and the browser-session
//! registry. The backend hands out one identity client / profile store pair
//! per browser session: identity clients carry per-session sign-in state,
//! and the Firestore store authenticates with that session's token.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{AppConfig, FirebaseConfig, IdentityProviderKind, ProfileStoreKind};
use crate::services::firebase::{FirebaseAuthClient, FirestoreProfileStore, http_client};
use crate::services::identity::IdentityClient;
use crate::services::memory::{MemoryIdentityDirectory, MemoryProfileStore};
use crate::services::pg_store::PgProfileStore;
use crate::services::profile_store::ProfileStore;
use crate::services::registry::SessionRegistry;
use crate::services::session::SessionController;

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("{0} backend selected without Firebase settings")]
    MissingFirebase(&'static str),
    #[error("postgres profile store selected without DATABASE_URL")]
    MissingDatabaseUrl,
    #[error("http client: {0}")]
    Http(#[from] reqwest::Error),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

// =============================================================================
// BACKEND
// =============================================================================

#[derive(Clone)]
enum IdentityBackend {
    Firebase { http: reqwest::Client, config: FirebaseConfig },
    Memory(MemoryIdentityDirectory),
}

#[derive(Clone)]
enum StoreBackend {
    Firestore { http: reqwest::Client, config: FirebaseConfig },
    Postgres(PgProfileStore),
    Memory(MemoryProfileStore),
}

/// Factory for per-session backend handles.
#[derive(Clone)]
pub struct Backend {
    identity: IdentityBackend,
    store: StoreBackend,
}

impl Backend {
    /// Fully in-memory backend sharing the given directory and store.
    #[must_use]
    pub fn memory(directory: MemoryIdentityDirectory, store: MemoryProfileStore) -> Self {
        Self { identity: IdentityBackend::Memory(directory), store: StoreBackend::Memory(store) }
    }

    /// Build the backend selected by `config`. Connects and migrates the
    /// database when the Postgres store is selected.
    ///
    /// # Errors
    ///
    /// Returns an error if required settings are missing, the HTTP client
    /// cannot be built, or the database is unreachable.
    pub async fn from_config(config: &AppConfig) -> Result<Self, StateError> {
        let http = match &config.firebase {
            Some(firebase) => Some(http_client(firebase.timeouts)?),
            None => None,
        };
        let firebase = |what: &'static str| -> Result<(reqwest::Client, FirebaseConfig), StateError> {
            match (&http, &config.firebase) {
                (Some(http), Some(firebase)) => Ok((http.clone(), firebase.clone())),
                _ => Err(StateError::MissingFirebase(what)),
            }
        };

        let identity = match config.identity_provider {
            IdentityProviderKind::Firebase => {
                let (http, config) = firebase("identity")?;
                IdentityBackend::Firebase { http, config }
            }
            IdentityProviderKind::Memory => IdentityBackend::Memory(MemoryIdentityDirectory::new()),
        };

        let store = match config.profile_store {
            ProfileStoreKind::Firestore => {
                let (http, config) = firebase("profile store")?;
                StoreBackend::Firestore { http, config }
            }
            ProfileStoreKind::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .ok_or(StateError::MissingDatabaseUrl)?;
                StoreBackend::Postgres(PgProfileStore::new(crate::db::init_pool(url).await?))
            }
            ProfileStoreKind::Memory => StoreBackend::Memory(MemoryProfileStore::new()),
        };

        if config.identity_provider == IdentityProviderKind::Memory && config.profile_store == ProfileStoreKind::Firestore
        {
            tracing::warn!("firestore profile store with memory identities: document requests will be rejected");
        }
        tracing::info!(
            identity = ?config.identity_provider,
            store = ?config.profile_store,
            "backend configured"
        );

        Ok(Self { identity, store })
    }

    /// Fresh identity client and profile store for one browser session.
    #[must_use]
    pub fn open_session(&self) -> (Arc<dyn IdentityClient>, Arc<dyn ProfileStore>) {
        let identity: Arc<dyn IdentityClient> = match &self.identity {
            IdentityBackend::Firebase { http, config } => Arc::new(FirebaseAuthClient::new(http.clone(), config)),
            IdentityBackend::Memory(directory) => Arc::new(directory.client()),
        };
        let store: Arc<dyn ProfileStore> = match &self.store {
            StoreBackend::Firestore { http, config } => {
                Arc::new(FirestoreProfileStore::new(http.clone(), config, identity.observe_session()))
            }
            StoreBackend::Postgres(store) => Arc::new(store.clone()),
            StoreBackend::Memory(store) => Arc::new(store.clone()),
        };
        (identity, store)
    }

    /// Start a session controller over fresh backend handles.
    #[must_use]
    pub fn start_controller(&self) -> SessionController {
        let (identity, store) = self.open_session();
        SessionController::start(identity, store)
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub backend: Backend,
    pub sessions: SessionRegistry,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig, backend: Backend) -> Self {
        let sessions = SessionRegistry::new(Duration::from_secs(config.session_idle_secs));
        Self { config: Arc::new(config), backend, sessions }
    }

    #[must_use]
    pub fn settle_timeout(&self) -> Duration {
        Duration::from_millis(self.config.settle_timeout_ms)
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
