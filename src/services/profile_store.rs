//! Profile documents and the store capability that persists them.
//!
//! DESIGN
//! ======
//! One document per identity, keyed by the identity's uid, read and written
//! wholesale. Dates are stored as serializable values (RFC 3339 text is
//! written; epoch millis and `{seconds, nanoseconds}` objects are accepted on
//! read) and normalized into `OffsetDateTime` when a document is loaded.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::ErrorCode;
use crate::services::identity::Identity;

// =============================================================================
// MODEL
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Pending,
    Expired,
}

/// One shared-service slot held by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub service_name: String,
    /// Display string, e.g. `"$3.99"`.
    pub price: String,
    pub status: SubscriptionStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub start_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub expiry_date: OffsetDateTime,
    pub slot_number: u32,
}

/// Subscription fields supplied by the caller; the id is assigned on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubscription {
    pub service_name: String,
    pub price: String,
    pub status: SubscriptionStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub start_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub expiry_date: OffsetDateTime,
    pub slot_number: u32,
}

impl NewSubscription {
    #[must_use]
    pub fn with_id(self, id: String) -> Subscription {
        Subscription {
            id,
            service_name: self.service_name,
            price: self.price,
            status: self.status,
            start_date: self.start_date,
            expiry_date: self.expiry_date,
            slot_number: self.slot_number,
        }
    }
}

/// Application-level record of a user and their subscriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    pub phone_number: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub subscriptions: Vec<Subscription>,
}

impl Profile {
    /// Fresh profile for a just-created identity.
    #[must_use]
    pub fn new(identity: &Identity, display_name: &str, phone_number: &str, created_at: OffsetDateTime) -> Self {
        Self {
            uid: identity.uid.clone(),
            email: identity.email.clone(),
            display_name: display_name.to_owned(),
            phone_number: phone_number.to_owned(),
            created_at,
            subscriptions: Vec::new(),
        }
    }

    /// Serialize into the stored document shape.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Decode`] if serialization fails.
    pub fn to_document(&self) -> Result<Value, StoreError> {
        serde_json::to_value(self).map_err(|e| StoreError::Decode(e.to_string()))
    }

    /// Parse a stored document and normalize its date fields.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Decode`] if required fields are missing.
    pub fn from_document(document: Value) -> Result<Self, StoreError> {
        let stored: StoredProfile = serde_json::from_value(document).map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(stored.normalize(OffsetDateTime::now_utc()))
    }
}

// =============================================================================
// STORED SHAPE
// =============================================================================

/// A date as it may appear in a stored document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StoredDate {
    Millis(i64),
    /// Millis stored as a double, as Firestore `doubleValue` fields are.
    MillisFloat(f64),
    Text(String),
    Timestamp {
        seconds: i64,
        #[serde(default)]
        nanoseconds: i64,
    },
    Unreadable(Value),
}

impl StoredDate {
    #[must_use]
    pub fn resolve(&self) -> Option<OffsetDateTime> {
        match self {
            Self::Millis(ms) => OffsetDateTime::from_unix_timestamp_nanos(i128::from(*ms) * 1_000_000).ok(),
            Self::MillisFloat(ms) => millis_from_float(*ms)
                .and_then(|ms| OffsetDateTime::from_unix_timestamp_nanos(i128::from(ms) * 1_000_000).ok()),
            Self::Text(text) => OffsetDateTime::parse(text.trim(), &Rfc3339).ok(),
            Self::Timestamp { seconds, nanoseconds } => {
                OffsetDateTime::from_unix_timestamp_nanos(i128::from(*seconds) * 1_000_000_000 + i128::from(*nanoseconds))
                    .ok()
            }
            Self::Unreadable(_) => None,
        }
    }
}

/// Largest timestamp a JS `Date` accepts, in millis either side of the epoch.
const MAX_DATE_MILLIS: f64 = 8.64e15;

/// Whole millis from a fractional value, truncated toward zero.
#[allow(clippy::cast_possible_truncation)]
fn millis_from_float(ms: f64) -> Option<i64> {
    (ms.is_finite() && ms.abs() <= MAX_DATE_MILLIS).then(|| ms.trunc() as i64)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSubscription {
    id: String,
    service_name: String,
    price: String,
    status: SubscriptionStatus,
    #[serde(default)]
    start_date: Option<StoredDate>,
    #[serde(default)]
    expiry_date: Option<StoredDate>,
    slot_number: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredProfile {
    uid: String,
    email: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    phone_number: String,
    #[serde(default)]
    created_at: Option<StoredDate>,
    #[serde(default)]
    subscriptions: Option<Vec<StoredSubscription>>,
}

impl StoredProfile {
    /// Missing or unreadable `createdAt` becomes `now`; unreadable
    /// subscription dates become the Unix epoch.
    fn normalize(self, now: OffsetDateTime) -> Profile {
        let subscriptions = self
            .subscriptions
            .unwrap_or_default()
            .into_iter()
            .map(|sub| Subscription {
                start_date: resolve_or_epoch(sub.start_date.as_ref(), &sub.id, "startDate"),
                expiry_date: resolve_or_epoch(sub.expiry_date.as_ref(), &sub.id, "expiryDate"),
                id: sub.id,
                service_name: sub.service_name,
                price: sub.price,
                status: sub.status,
                slot_number: sub.slot_number,
            })
            .collect();

        Profile {
            created_at: self.created_at.as_ref().and_then(StoredDate::resolve).unwrap_or(now),
            uid: self.uid,
            email: self.email,
            display_name: self.display_name,
            phone_number: self.phone_number,
            subscriptions,
        }
    }
}

fn resolve_or_epoch(date: Option<&StoredDate>, subscription_id: &str, field: &'static str) -> OffsetDateTime {
    date.and_then(StoredDate::resolve).unwrap_or_else(|| {
        tracing::warn!(%subscription_id, field, "unreadable stored date; using epoch");
        OffsetDateTime::UNIX_EPOCH
    })
}

// =============================================================================
// STORE CAPABILITY
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no signed-in identity to authorize the request")]
    Unauthenticated,
    #[error("profile store request failed: {0}")]
    Request(String),
    #[error("profile store responded with status {status}")]
    Response { status: u16, body: String },
    #[error("profile document could not be decoded: {0}")]
    Decode(String),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

impl ErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "E_STORE_UNAUTHENTICATED",
            Self::Request(_) => "E_STORE_REQUEST",
            Self::Response { .. } => "E_STORE_RESPONSE",
            Self::Decode(_) => "E_STORE_DECODE",
            Self::Db(_) => "E_STORE_DB",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Response { status: 429 | 500..=599, .. })
    }
}

/// Document store holding one [`Profile`] per identity.
#[async_trait::async_trait]
pub trait ProfileStore: Send + Sync {
    /// Read and normalize the profile stored under `id`, if any.
    async fn read_document(&self, id: &str) -> Result<Option<Profile>, StoreError>;

    /// Replace the document stored under `id`.
    async fn write_document(&self, id: &str, profile: &Profile) -> Result<(), StoreError>;
}

#[cfg(test)]
#[path = "profile_store_test.rs"]
mod tests;
