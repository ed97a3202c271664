//! Identity capability: account creation, password sign-in, session events.
//!
//! ARCHITECTURE
//! ============
//! An [`IdentityClient`] is scoped to one browser session. It owns a
//! [`SessionChannel`] (a `watch` channel of the signed-in identity) that the
//! session controller observes; sign-in, sign-up and sign-out publish on it.
//! Provider-specific failures are reduced to an [`IdentityErrorKind`] so the
//! UI can pick a localized message without knowing the provider.

use std::fmt;

use serde::Serialize;
use tokio::sync::watch;

use crate::error::ErrorCode;

// =============================================================================
// IDENTITY
// =============================================================================

/// Authenticated principal issued by the identity provider.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    /// Bearer credential for provider-backed stores. Never serialized.
    #[serde(skip)]
    pub id_token: String,
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("uid", &self.uid)
            .field("email", &self.email)
            .field("display_name", &self.display_name)
            .field("id_token", &"<redacted>")
            .finish()
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// User-facing failure categories for identity operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityErrorKind {
    AccountNotFound,
    WrongCredential,
    EmailAlreadyRegistered,
    WeakCredential,
    MalformedEmail,
    Unknown,
}

impl IdentityErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AccountNotFound => "account_not_found",
            Self::WrongCredential => "wrong_credential",
            Self::EmailAlreadyRegistered => "email_already_registered",
            Self::WeakCredential => "weak_credential",
            Self::MalformedEmail => "malformed_email",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for IdentityErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind}: {detail}")]
pub struct IdentityError {
    pub kind: IdentityErrorKind,
    pub detail: String,
}

impl IdentityError {
    pub fn new(kind: IdentityErrorKind, detail: impl Into<String>) -> Self {
        Self { kind, detail: detail.into() }
    }

    pub fn unknown(detail: impl Into<String>) -> Self {
        Self::new(IdentityErrorKind::Unknown, detail)
    }
}

impl ErrorCode for IdentityError {
    fn error_code(&self) -> &'static str {
        match self.kind {
            IdentityErrorKind::AccountNotFound => "E_ACCOUNT_NOT_FOUND",
            IdentityErrorKind::WrongCredential => "E_WRONG_CREDENTIAL",
            IdentityErrorKind::EmailAlreadyRegistered => "E_EMAIL_IN_USE",
            IdentityErrorKind::WeakCredential => "E_WEAK_CREDENTIAL",
            IdentityErrorKind::MalformedEmail => "E_INVALID_EMAIL",
            IdentityErrorKind::Unknown => "E_IDENTITY",
        }
    }
}

// =============================================================================
// CLIENT CAPABILITY
// =============================================================================

/// Identity provider operations for a single browser session.
#[async_trait::async_trait]
pub trait IdentityClient: Send + Sync {
    /// Register a new account and sign it in.
    async fn create_account(&self, email: &str, password: &str) -> Result<Identity, IdentityError>;

    /// Sign in an existing account.
    async fn authenticate(&self, email: &str, password: &str) -> Result<Identity, IdentityError>;

    /// Sign out the current identity, if any.
    async fn sign_out(&self) -> Result<(), IdentityError>;

    /// Subscribe to session changes. The current value is observable immediately.
    fn observe_session(&self) -> watch::Receiver<Option<Identity>>;

    /// Set the provider-side display name of `identity`.
    async fn update_display_name(&self, identity: &Identity, name: &str) -> Result<(), IdentityError>;
}

/// Session-change notifications shared by identity client implementations.
pub struct SessionChannel {
    tx: watch::Sender<Option<Identity>>,
}

impl SessionChannel {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.tx.subscribe()
    }

    #[must_use]
    pub fn current(&self) -> Option<Identity> {
        self.tx.borrow().clone()
    }

    /// Publish a signed-in identity to all observers.
    pub fn signed_in(&self, identity: Identity) {
        self.tx.send_replace(Some(identity));
    }

    /// Publish the signed-out state to all observers.
    pub fn signed_out(&self) {
        self.tx.send_replace(None);
    }

    /// Update the display name of the current identity in place.
    ///
    /// Observers are not notified: a rename is not a session change.
    pub fn rename(&self, uid: &str, name: &str) {
        self.tx.send_if_modified(|current| {
            if let Some(identity) = current.as_mut().filter(|i| i.uid == uid) {
                identity.display_name = Some(name.to_owned());
            }
            false
        });
    }
}

impl Default for SessionChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercase and sanity-check an email address.
#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    let (local, domain) = normalized.split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return None;
    }
    Some(normalized)
}

#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;
