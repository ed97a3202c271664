//! Session controller: reconciles identity events with profile documents.
//!
//! ARCHITECTURE
//! ============
//! One controller per browser session. It owns the session's identity
//! client and profile store handles and publishes a [`SessionSnapshot`]
//! (`identity`, `profile`, `loading`) on a `watch` channel. Views read the
//! snapshot; mutations (`signup`, `login`, `logout`, `add_subscription`) are
//! awaited by the caller before it reads the next snapshot.
//!
//! A spawned observer task follows the identity client's session channel.
//! For each value it loads the matching profile document and publishes
//! identity and profile together, then clears `loading` after the first one.
//!
//! TRADE-OFFS
//! ==========
//! The profile document is read and written wholesale with no version
//! check: the observer and explicit operations may both publish, and the last
//! write wins. This assumes one active client per identity.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Serialize;
use time::OffsetDateTime;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::identity::{Identity, IdentityClient, IdentityError};
use super::profile_store::{NewSubscription, Profile, ProfileStore, StoreError, Subscription};
use crate::error::ErrorCode;

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Where the session sits in `Loading -> {Authenticated | Anonymous}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Loading,
    Authenticated,
    Anonymous,
}

/// Unified view of the session exposed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub identity: Option<Identity>,
    pub profile: Option<Profile>,
    pub loading: bool,
}

impl SessionSnapshot {
    #[must_use]
    pub fn initial() -> Self {
        Self { identity: None, profile: None, loading: true }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.loading {
            SessionPhase::Loading
        } else if self.identity.is_some() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Anonymous
        }
    }

    fn holds(&self, uid: &str) -> bool {
        self.identity.as_ref().is_some_and(|i| i.uid == uid)
    }
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("session did not settle within {0:?}")]
    SettleTimeout(Duration),
}

impl ErrorCode for SessionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Identity(e) => e.error_code(),
            Self::Store(e) => e.error_code(),
            Self::SettleTimeout(_) => "E_SESSION_TIMEOUT",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Identity(e) => e.retryable(),
            Self::Store(e) => e.retryable(),
            Self::SettleTimeout(_) => true,
        }
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

pub struct SessionController {
    identity: Arc<dyn IdentityClient>,
    store: Arc<dyn ProfileStore>,
    state: Arc<watch::Sender<SessionSnapshot>>,
    observer: JoinHandle<()>,
}

impl SessionController {
    /// Create the controller and start observing the identity client.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn start(identity: Arc<dyn IdentityClient>, store: Arc<dyn ProfileStore>) -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot::initial());
        let state = Arc::new(tx);
        let observer = tokio::spawn(observe_session(identity.observe_session(), Arc::clone(&store), Arc::clone(&state)));
        Self { identity, store, state, observer }
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// Receiver that changes whenever the snapshot is republished.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// Wait until the first session notification has been processed.
    pub async fn ready(&self) -> SessionSnapshot {
        let mut rx = self.subscribe();
        match rx.wait_for(|s| !s.loading).await {
            Ok(snapshot) => snapshot.clone(),
            Err(_) => self.snapshot(),
        }
    }

    /// Wait until the observer has published `uid` as the current identity.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::SettleTimeout`] if that does not happen in time.
    pub async fn settle(&self, uid: &str, timeout: Duration) -> Result<SessionSnapshot, SessionError> {
        let mut rx = self.subscribe();
        let waited = tokio::time::timeout(timeout, async {
            rx.wait_for(|s| !s.loading && s.holds(uid))
                .await
                .map(|s| s.clone())
        })
        .await;
        match waited {
            Ok(Ok(snapshot)) => Ok(snapshot),
            Ok(Err(_)) => Ok(self.snapshot()),
            Err(_) => Err(SessionError::SettleTimeout(timeout)),
        }
    }

    /// Create an account, persist its empty profile, and adopt both.
    ///
    /// Field validation (name, phone prefix) is the caller's responsibility.
    ///
    /// # Errors
    ///
    /// Identity failures surface as [`SessionError::Identity`]; a failed
    /// profile write surfaces as [`SessionError::Store`].
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
        phone_number: &str,
    ) -> Result<Profile, SessionError> {
        let mut identity = self.identity.create_account(email, password).await?;
        self.identity
            .update_display_name(&identity, display_name)
            .await?;
        identity.display_name = Some(display_name.to_owned());

        let profile = Profile::new(&identity, display_name, phone_number, OffsetDateTime::now_utc());
        self.store
            .write_document(&identity.uid, &profile)
            .await?;

        info!(uid = %identity.uid, "account created");
        let adopted = profile.clone();
        self.state.send_modify(|s| {
            s.identity = Some(identity);
            s.profile = Some(adopted);
            s.loading = false;
        });
        Ok(profile)
    }

    /// Sign in. The profile is loaded by the observer, not here.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Identity`] when the provider rejects the credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, SessionError> {
        let identity = self.identity.authenticate(email, password).await?;
        info!(uid = %identity.uid, "signed in");
        Ok(identity)
    }

    /// Sign out and clear identity and profile immediately.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Identity`] if the provider sign-out fails.
    pub async fn logout(&self) -> Result<(), SessionError> {
        self.identity.sign_out().await?;
        self.state.send_modify(|s| {
            s.identity = None;
            s.profile = None;
            s.loading = false;
        });
        info!("signed out");
        Ok(())
    }

    /// Append a subscription to the current profile and persist it.
    ///
    /// Returns `Ok(None)` without touching the store when nobody is signed in
    /// or the profile has not been loaded.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] if the profile write fails.
    pub async fn add_subscription(&self, data: NewSubscription) -> Result<Option<Subscription>, SessionError> {
        let (uid, mut profile) = {
            let current = self.state.borrow();
            match (&current.identity, &current.profile) {
                (Some(identity), Some(profile)) => (identity.uid.clone(), profile.clone()),
                _ => return Ok(None),
            }
        };

        let subscription = data.with_id(next_subscription_id(&profile, now_ms()));
        profile.subscriptions.push(subscription.clone());
        self.store.write_document(&uid, &profile).await?;

        info!(%uid, subscription_id = %subscription.id, service = %subscription.service_name, "subscription added");
        self.state.send_if_modified(|s| {
            // A logout during the write must not resurrect the profile.
            if !s.holds(&uid) {
                return false;
            }
            s.profile = Some(profile);
            true
        });
        Ok(Some(subscription))
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.observer.abort();
    }
}

// =============================================================================
// OBSERVER
// =============================================================================

async fn observe_session(
    mut session: watch::Receiver<Option<Identity>>,
    store: Arc<dyn ProfileStore>,
    state: Arc<watch::Sender<SessionSnapshot>>,
) {
    loop {
        let identity = session.borrow_and_update().clone();
        let loaded = match &identity {
            Some(identity) => load_profile(store.as_ref(), identity).await,
            None => None,
        };

        // Identity changed while the read was in flight; process the newer value.
        if session.has_changed().unwrap_or(false) {
            continue;
        }

        state.send_modify(|s| publish(s, identity, loaded));

        if session.changed().await.is_err() {
            break;
        }
    }
}

/// Apply one processed notification to the snapshot.
fn publish(snapshot: &mut SessionSnapshot, identity: Option<Identity>, loaded: Option<Profile>) {
    snapshot.profile = match (&identity, loaded) {
        (Some(_), Some(profile)) => Some(profile),
        // No document yet: keep a profile already adopted for this uid (signup race).
        (Some(identity), None) => snapshot
            .profile
            .take()
            .filter(|p| p.uid == identity.uid),
        (None, _) => None,
    };
    snapshot.identity = identity;
    snapshot.loading = false;
}

async fn load_profile(store: &dyn ProfileStore, identity: &Identity) -> Option<Profile> {
    match store.read_document(&identity.uid).await {
        Ok(profile) => profile,
        Err(e) => {
            warn!(uid = %identity.uid, error = %e, code = e.error_code(), "profile read failed");
            None
        }
    }
}

/// Current time as milliseconds since Unix epoch.
fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// Time-derived subscription id, bumped past any id already in `profile`.
pub(crate) fn next_subscription_id(profile: &Profile, now_ms: u128) -> String {
    let mut candidate = now_ms;
    while profile
        .subscriptions
        .iter()
        .any(|s| s.id == candidate.to_string())
    {
        candidate += 1;
    }
    candidate.to_string()
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
