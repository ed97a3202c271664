//! Browser-session registry.
//!
//! DESIGN
//! ======
//! Each browser holds an opaque random token in a cookie; the registry maps
//! it to that browser's [`SessionController`]. Entries remember when they
//! were last touched and a background task sweeps idle ones, dropping the
//! controller (which stops its observer task).

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::info;

use super::session::SessionController;

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

struct Entry {
    controller: Arc<SessionController>,
    last_seen: Instant,
}

#[derive(Clone)]
pub struct SessionRegistry {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    idle_timeout: Duration,
}

impl SessionRegistry {
    #[must_use]
    pub fn new(idle_timeout: Duration) -> Self {
        Self { entries: Arc::new(RwLock::new(HashMap::new())), idle_timeout }
    }

    /// Register a controller under a fresh token.
    pub async fn insert(&self, controller: SessionController) -> (String, Arc<SessionController>) {
        let token = generate_token();
        let controller = Arc::new(controller);
        let entry = Entry { controller: Arc::clone(&controller), last_seen: Instant::now() };
        self.entries.write().await.insert(token.clone(), entry);
        (token, controller)
    }

    /// Look up a live session and mark it as used.
    pub async fn get(&self, token: &str) -> Option<Arc<SessionController>> {
        let mut entries = self.entries.write().await;
        let entry = entries.get_mut(token)?;
        entry.last_seen = Instant::now();
        Some(Arc::clone(&entry.controller))
    }

    pub async fn remove(&self, token: &str) -> Option<Arc<SessionController>> {
        self.entries
            .write()
            .await
            .remove(token)
            .map(|e| e.controller)
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop sessions idle for longer than the timeout as of `now`.
    pub async fn sweep(&self, now: Instant) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, e| now.saturating_duration_since(e.last_seen) <= self.idle_timeout);
        before - entries.len()
    }
}

/// Spawn the idle-session sweeper. Returns a handle for shutdown.
pub fn spawn_sweeper(registry: SessionRegistry, interval: Duration) -> JoinHandle<()> {
    info!(interval_secs = interval.as_secs(), idle_secs = registry.idle_timeout.as_secs(), "session sweeper configured");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let removed = registry.sweep(Instant::now()).await;
            if removed > 0 {
                info!(removed, "idle sessions swept");
            }
        }
    })
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
