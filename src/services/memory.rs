//! In-process identity directory and profile store.
//!
//! Used for local development (`IDENTITY_PROVIDER=memory`,
//! `PROFILE_STORE=memory`) and as the test double for the session
//! controller. Nothing survives a restart.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::sync::{RwLock, watch};
use uuid::Uuid;

use super::identity::{
    Identity, IdentityClient, IdentityError, IdentityErrorKind, SessionChannel, normalize_email,
};
use super::profile_store::{Profile, ProfileStore, StoreError};
use super::registry::generate_token;

/// Minimum password length, matching the hosted provider's rule.
pub const MIN_PASSWORD_LEN: usize = 6;

// =============================================================================
// IDENTITY
// =============================================================================

#[derive(Debug, Clone)]
struct Account {
    uid: String,
    email: String,
    password: String,
    display_name: Option<String>,
}

impl Account {
    fn identity(&self) -> Identity {
        Identity {
            uid: self.uid.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            id_token: generate_token(),
        }
    }
}

/// Account table shared by every session's [`MemoryIdentityClient`].
#[derive(Clone, Default)]
pub struct MemoryIdentityDirectory {
    accounts: Arc<Mutex<HashMap<String, Account>>>,
}

impl MemoryIdentityDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh signed-out client bound to this directory.
    #[must_use]
    pub fn client(&self) -> MemoryIdentityClient {
        MemoryIdentityClient { directory: self.clone(), session: SessionChannel::new() }
    }

    #[cfg(test)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[cfg(test)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored display name for `email`, if the account exists.
    #[cfg(test)]
    #[must_use]
    pub fn display_name(&self, email: &str) -> Option<String> {
        let email = normalize_email(email)?;
        self.lock().get(&email).and_then(|a| a.display_name.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Account>> {
        // A poisoned map is still structurally valid; keep serving it.
        self.accounts.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

pub struct MemoryIdentityClient {
    directory: MemoryIdentityDirectory,
    session: SessionChannel,
}

#[async_trait::async_trait]
impl IdentityClient for MemoryIdentityClient {
    async fn create_account(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        let email = normalize_email(email)
            .ok_or_else(|| IdentityError::new(IdentityErrorKind::MalformedEmail, "email is not well formed"))?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(IdentityError::new(
                IdentityErrorKind::WeakCredential,
                format!("password shorter than {MIN_PASSWORD_LEN} characters"),
            ));
        }

        let identity = {
            let mut accounts = self.directory.lock();
            if accounts.contains_key(&email) {
                return Err(IdentityError::new(IdentityErrorKind::EmailAlreadyRegistered, email));
            }
            let account = Account {
                uid: Uuid::new_v4().simple().to_string(),
                email: email.clone(),
                password: password.to_owned(),
                display_name: None,
            };
            let identity = account.identity();
            accounts.insert(email, account);
            identity
        };

        self.session.signed_in(identity.clone());
        Ok(identity)
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        let email = normalize_email(email)
            .ok_or_else(|| IdentityError::new(IdentityErrorKind::MalformedEmail, "email is not well formed"))?;

        let identity = {
            let accounts = self.directory.lock();
            let account = accounts
                .get(&email)
                .ok_or_else(|| IdentityError::new(IdentityErrorKind::AccountNotFound, email.clone()))?;
            if account.password != password {
                return Err(IdentityError::new(IdentityErrorKind::WrongCredential, email));
            }
            account.identity()
        };

        self.session.signed_in(identity.clone());
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.session.signed_out();
        Ok(())
    }

    fn observe_session(&self) -> watch::Receiver<Option<Identity>> {
        self.session.subscribe()
    }

    async fn update_display_name(&self, identity: &Identity, name: &str) -> Result<(), IdentityError> {
        {
            let mut accounts = self.directory.lock();
            let account = accounts
                .values_mut()
                .find(|a| a.uid == identity.uid)
                .ok_or_else(|| IdentityError::new(IdentityErrorKind::AccountNotFound, identity.uid.clone()))?;
            account.display_name = Some(name.to_owned());
        }
        self.session.rename(&identity.uid, name);
        Ok(())
    }
}

// =============================================================================
// PROFILE STORE
// =============================================================================

/// Documents kept as JSON so reads go through the same normalization as
/// remote stores.
#[derive(Clone, Default)]
pub struct MemoryProfileStore {
    documents: Arc<RwLock<HashMap<String, Value>>>,
}

impl MemoryProfileStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw document, bypassing serialization.
    #[cfg(test)]
    pub async fn insert_raw(&self, id: &str, document: Value) {
        self.documents.write().await.insert(id.to_owned(), document);
    }

    #[cfg(test)]
    pub async fn raw(&self, id: &str) -> Option<Value> {
        self.documents.read().await.get(id).cloned()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait::async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn read_document(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        let document = self.documents.read().await.get(id).cloned();
        document.map(Profile::from_document).transpose()
    }

    async fn write_document(&self, id: &str, profile: &Profile) -> Result<(), StoreError> {
        let document = profile.to_document()?;
        self.documents.write().await.insert(id.to_owned(), document);
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
