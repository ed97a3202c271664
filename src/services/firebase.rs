//! Firebase Auth and Firestore REST adapters.
//!
//! SYSTEM CONTEXT
//! ==============
//! The hosted identity provider and document store are reached over their
//! public REST APIs. Auth uses the `accounts:*` endpoints keyed by the web API
//! key; Firestore requests carry the signed-in user's ID token so the
//! project's security rules apply exactly as they would for the browser SDK.
//!
//! Firestore documents are typed (`stringValue`, `mapValue`, ...). Profiles
//! are converted to and from plain JSON at this boundary so the rest of the
//! crate only sees [`Profile`].

use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Number, Value, json};
use tokio::sync::watch;

use super::identity::{Identity, IdentityClient, IdentityError, IdentityErrorKind, SessionChannel};
use super::profile_store::{Profile, ProfileStore, StoreError};
use crate::config::{FirebaseConfig, HttpTimeouts};

/// Build the shared HTTP client for Firebase calls.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized.
pub fn http_client(timeouts: HttpTimeouts) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeouts.request_secs))
        .connect_timeout(Duration::from_secs(timeouts.connect_secs))
        .build()
}

// =============================================================================
// AUTH
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    id_token: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Map a Firebase Auth REST error message (e.g. `"WEAK_PASSWORD : Password
/// should be at least 6 characters"`) to a user-facing kind.
#[must_use]
pub fn map_auth_error(message: &str) -> IdentityErrorKind {
    let code = message.split([' ', ':']).next().unwrap_or_default();
    match code {
        "EMAIL_NOT_FOUND" | "USER_NOT_FOUND" => IdentityErrorKind::AccountNotFound,
        "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => IdentityErrorKind::WrongCredential,
        "EMAIL_EXISTS" => IdentityErrorKind::EmailAlreadyRegistered,
        "WEAK_PASSWORD" => IdentityErrorKind::WeakCredential,
        "INVALID_EMAIL" | "MISSING_EMAIL" => IdentityErrorKind::MalformedEmail,
        _ => IdentityErrorKind::Unknown,
    }
}

/// Per-session Firebase Auth client.
pub struct FirebaseAuthClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    session: SessionChannel,
}

impl FirebaseAuthClient {
    #[must_use]
    pub fn new(http: reqwest::Client, config: &FirebaseConfig) -> Self {
        Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config.auth_base_url.clone(),
            session: SessionChannel::new(),
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/accounts:{action}?key={}", self.base_url, self.api_key)
    }

    async fn post(&self, action: &str, body: &Value) -> Result<String, IdentityError> {
        let response = self
            .http
            .post(self.endpoint(action))
            .json(body)
            .send()
            .await
            .map_err(|e| IdentityError::unknown(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| IdentityError::unknown(e.to_string()))?;

        if status.is_success() {
            return Ok(text);
        }

        let message = serde_json::from_str::<ErrorEnvelope>(&text)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| format!("status {status}"));
        tracing::debug!(action, %status, %message, "firebase auth rejected request");
        Err(IdentityError::new(map_auth_error(&message), message))
    }

    async fn password_account(&self, action: &str, email: &str, password: &str) -> Result<Identity, IdentityError> {
        let body = json!({ "email": email, "password": password, "returnSecureToken": true });
        let text = self.post(action, &body).await?;
        let account: AccountResponse =
            serde_json::from_str(&text).map_err(|e| IdentityError::unknown(format!("unexpected response: {e}")))?;

        let identity = Identity {
            uid: account.local_id,
            email: if account.email.is_empty() { email.to_owned() } else { account.email },
            display_name: account.display_name.filter(|n| !n.is_empty()),
            id_token: account.id_token,
        };
        self.session.signed_in(identity.clone());
        Ok(identity)
    }
}

#[async_trait::async_trait]
impl IdentityClient for FirebaseAuthClient {
    async fn create_account(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        self.password_account("signUp", email, password).await
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        self.password_account("signInWithPassword", email, password)
            .await
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        // ID tokens are bearer tokens; forgetting them is the sign-out.
        self.session.signed_out();
        Ok(())
    }

    fn observe_session(&self) -> watch::Receiver<Option<Identity>> {
        self.session.subscribe()
    }

    async fn update_display_name(&self, identity: &Identity, name: &str) -> Result<(), IdentityError> {
        let body = json!({ "idToken": identity.id_token, "displayName": name, "returnSecureToken": false });
        self.post("update", &body).await?;
        self.session.rename(&identity.uid, name);
        Ok(())
    }
}

// =============================================================================
// FIRESTORE
// =============================================================================

/// Profile store backed by one Firestore collection.
pub struct FirestoreProfileStore {
    http: reqwest::Client,
    documents_url: String,
    collection: String,
    session: watch::Receiver<Option<Identity>>,
}

impl FirestoreProfileStore {
    /// Store authorized by whichever identity `session` currently holds.
    #[must_use]
    pub fn new(http: reqwest::Client, config: &FirebaseConfig, session: watch::Receiver<Option<Identity>>) -> Self {
        Self {
            http,
            documents_url: documents_url(config),
            collection: config.collection.clone(),
            session,
        }
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/{}/{id}", self.documents_url, self.collection)
    }

    fn bearer(&self) -> Result<String, StoreError> {
        self.session
            .borrow()
            .as_ref()
            .map(|identity| identity.id_token.clone())
            .ok_or(StoreError::Unauthenticated)
    }
}

#[must_use]
pub fn documents_url(config: &FirebaseConfig) -> String {
    format!(
        "{}/projects/{}/databases/{}/documents",
        config.firestore_base_url, config.project_id, config.database
    )
}

#[async_trait::async_trait]
impl ProfileStore for FirestoreProfileStore {
    async fn read_document(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        let token = self.bearer()?;
        let response = self
            .http
            .get(self.document_url(id))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let text = response
            .text()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        if !status.is_success() {
            return Err(StoreError::Response { status: status.as_u16(), body: text });
        }

        let document: Value = serde_json::from_str(&text).map_err(|e| StoreError::Decode(e.to_string()))?;
        let fields = document_to_json(&document)?;
        Profile::from_document(fields).map(Some)
    }

    async fn write_document(&self, id: &str, profile: &Profile) -> Result<(), StoreError> {
        let token = self.bearer()?;
        let body = json_to_document(&profile.to_document()?)?;
        let response = self
            .http
            .patch(self.document_url(id))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Response { status: status.as_u16(), body });
        }
        Ok(())
    }
}

// =============================================================================
// VALUE CODEC
// =============================================================================

/// Encode a JSON object as a Firestore document body (`{"fields": {...}}`).
///
/// # Errors
///
/// Returns [`StoreError::Decode`] if `object` is not a JSON object.
pub fn json_to_document(object: &Value) -> Result<Value, StoreError> {
    let Value::Object(map) = object else {
        return Err(StoreError::Decode("document root must be an object".into()));
    };
    Ok(json!({ "fields": encode_fields(map) }))
}

fn encode_fields(map: &Map<String, Value>) -> Value {
    Value::Object(map.iter().map(|(k, v)| (k.clone(), encode_value(v))).collect())
}

#[must_use]
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            // Firestore carries 64-bit integers as strings.
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or_default() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({ "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() } }),
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// Decode a Firestore document (`{"name": ..., "fields": {...}}`) into plain JSON.
///
/// # Errors
///
/// Returns [`StoreError::Decode`] on an unknown value type.
pub fn document_to_json(document: &Value) -> Result<Value, StoreError> {
    match document.get("fields") {
        Some(Value::Object(fields)) => decode_fields(fields),
        Some(_) => Err(StoreError::Decode("document fields must be an object".into())),
        None => Ok(Value::Object(Map::new())),
    }
}

fn decode_fields(fields: &Map<String, Value>) -> Result<Value, StoreError> {
    fields
        .iter()
        .map(|(k, v)| decode_value(v).map(|v| (k.clone(), v)))
        .collect::<Result<Map<_, _>, _>>()
        .map(Value::Object)
}

/// Decode one typed Firestore value.
///
/// # Errors
///
/// Returns [`StoreError::Decode`] on an unknown or malformed value.
pub fn decode_value(value: &Value) -> Result<Value, StoreError> {
    let Value::Object(typed) = value else {
        return Err(StoreError::Decode(format!("expected typed value, got {value}")));
    };
    let Some((kind, inner)) = typed.iter().next() else {
        return Err(StoreError::Decode("empty typed value".into()));
    };

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" | "geoPointValue" => Ok(inner.clone()),
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => Ok(inner.clone()),
        "integerValue" => {
            let parsed = match inner {
                Value::String(s) => s.parse::<i64>().ok(),
                Value::Number(n) => n.as_i64(),
                _ => None,
            };
            parsed
                .map(|i| Value::Number(i.into()))
                .ok_or_else(|| StoreError::Decode(format!("bad integerValue: {inner}")))
        }
        "doubleValue" => Ok(inner
            .as_f64()
            .and_then(Number::from_f64)
            .map_or(Value::Null, Value::Number)),
        "arrayValue" => match inner.get("values") {
            Some(Value::Array(items)) => items
                .iter()
                .map(decode_value)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            _ => Ok(Value::Array(Vec::new())),
        },
        "mapValue" => match inner.get("fields") {
            Some(Value::Object(fields)) => decode_fields(fields),
            _ => Ok(Value::Object(Map::new())),
        },
        other => Err(StoreError::Decode(format!("unsupported firestore value type {other}"))),
    }
}

#[cfg(test)]
#[path = "firebase_test.rs"]
mod tests;
