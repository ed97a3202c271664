//! Application configuration parsed from environment variables.
//!
//! `.env` is loaded by `main` (via `dotenvy`) before [`AppConfig::from_env`]
//! runs, so every knob below can live there during development.

use std::path::PathBuf;

use crate::views::auth_form::DEFAULT_PHONE_PREFIX;
use crate::views::contact::DEFAULT_WHATSAPP_NUMBER;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_FIREBASE_AUTH_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";
pub const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";
pub const DEFAULT_FIRESTORE_DATABASE: &str = "(default)";
pub const DEFAULT_PROFILE_COLLECTION: &str = "users";
pub const DEFAULT_HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 60 * 60 * 24;
pub const DEFAULT_SESSION_SWEEP_SECS: u64 = 60;
pub const DEFAULT_SETTLE_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env var {var}")]
    Missing { var: &'static str },
    #[error("invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityProviderKind {
    Firebase,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileStoreKind {
    Firestore,
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_HTTP_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_HTTP_CONNECT_TIMEOUT_SECS }
    }
}

/// Connection settings for the hosted Firebase project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub project_id: String,
    pub auth_base_url: String,
    pub firestore_base_url: String,
    pub database: String,
    pub collection: String,
    pub timeouts: HttpTimeouts,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub identity_provider: IdentityProviderKind,
    pub profile_store: ProfileStoreKind,
    /// Present whenever either backend is Firebase-hosted.
    pub firebase: Option<FirebaseConfig>,
    /// Present when `profile_store` is `Postgres`.
    pub database_url: Option<String>,
    pub whatsapp_number: String,
    pub phone_prefix: String,
    pub session_idle_secs: u64,
    pub session_sweep_secs: u64,
    pub settle_timeout_ms: u64,
    pub cookie_secure: bool,
    pub website_dir: PathBuf,
}

impl Default for AppConfig {
    /// Fully in-memory configuration; no external services required.
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            identity_provider: IdentityProviderKind::Memory,
            profile_store: ProfileStoreKind::Memory,
            firebase: None,
            database_url: None,
            whatsapp_number: DEFAULT_WHATSAPP_NUMBER.to_owned(),
            phone_prefix: DEFAULT_PHONE_PREFIX.to_owned(),
            session_idle_secs: DEFAULT_SESSION_IDLE_SECS,
            session_sweep_secs: DEFAULT_SESSION_SWEEP_SECS,
            settle_timeout_ms: DEFAULT_SETTLE_TIMEOUT_MS,
            cookie_secure: false,
            website_dir: default_website_dir(),
        }
    }
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Backends:
    /// - `IDENTITY_PROVIDER`: `firebase` (default) or `memory`
    /// - `PROFILE_STORE`: `firestore` (default), `postgres`, or `memory`
    /// - `FIREBASE_API_KEY`, `FIREBASE_PROJECT_ID`: required for Firebase backends
    /// - `FIREBASE_AUTH_BASE_URL`, `FIRESTORE_BASE_URL`, `FIRESTORE_DATABASE`,
    ///   `PROFILE_COLLECTION`: endpoint overrides
    /// - `DATABASE_URL`: required for `PROFILE_STORE=postgres`
    ///
    /// Optional:
    /// - `PORT` (3000), `WHATSAPP_NUMBER`, `PHONE_PREFIX` (`+593`)
    /// - `HTTP_REQUEST_TIMEOUT_SECS` (30), `HTTP_CONNECT_TIMEOUT_SECS` (10)
    /// - `SESSION_IDLE_SECS` (86400), `SESSION_SWEEP_SECS` (60)
    /// - `LOGIN_SETTLE_TIMEOUT_MS` (5000), `COOKIE_SECURE`, `WEBSITE_DIR` (bundled `website/`)
    ///
    /// # Errors
    ///
    /// Returns an error for unknown backend names, an unparseable `PORT`, or
    /// missing settings required by the selected backends.
    pub fn from_env() -> Result<Self, ConfigError> {
        let identity_provider = parse_identity_provider(env_opt("IDENTITY_PROVIDER").as_deref())?;
        let profile_store = parse_profile_store(env_opt("PROFILE_STORE").as_deref())?;

        let port = match env_opt("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { var: "PORT", value: raw })?,
            None => DEFAULT_PORT,
        };

        let needs_firebase =
            identity_provider == IdentityProviderKind::Firebase || profile_store == ProfileStoreKind::Firestore;
        let firebase = if needs_firebase { Some(firebase_from_env()?) } else { None };

        let database_url = match profile_store {
            ProfileStoreKind::Postgres => Some(env_required("DATABASE_URL")?),
            _ => None,
        };

        let defaults = Self::default();
        Ok(Self {
            port,
            identity_provider,
            profile_store,
            firebase,
            database_url,
            whatsapp_number: env_opt("WHATSAPP_NUMBER").unwrap_or(defaults.whatsapp_number),
            phone_prefix: env_opt("PHONE_PREFIX").unwrap_or(defaults.phone_prefix),
            session_idle_secs: env_parse("SESSION_IDLE_SECS", DEFAULT_SESSION_IDLE_SECS),
            session_sweep_secs: env_parse("SESSION_SWEEP_SECS", DEFAULT_SESSION_SWEEP_SECS),
            settle_timeout_ms: env_parse("LOGIN_SETTLE_TIMEOUT_MS", DEFAULT_SETTLE_TIMEOUT_MS),
            cookie_secure: env_bool("COOKIE_SECURE").unwrap_or(false),
            website_dir: env_opt("WEBSITE_DIR").map_or(defaults.website_dir, PathBuf::from),
        })
    }
}

fn firebase_from_env() -> Result<FirebaseConfig, ConfigError> {
    Ok(FirebaseConfig {
        api_key: env_required("FIREBASE_API_KEY")?,
        project_id: env_required("FIREBASE_PROJECT_ID")?,
        auth_base_url: base_url(env_opt("FIREBASE_AUTH_BASE_URL"), DEFAULT_FIREBASE_AUTH_BASE_URL),
        firestore_base_url: base_url(env_opt("FIRESTORE_BASE_URL"), DEFAULT_FIRESTORE_BASE_URL),
        database: env_opt("FIRESTORE_DATABASE").unwrap_or_else(|| DEFAULT_FIRESTORE_DATABASE.to_owned()),
        collection: env_opt("PROFILE_COLLECTION").unwrap_or_else(|| DEFAULT_PROFILE_COLLECTION.to_owned()),
        timeouts: HttpTimeouts {
            request_secs: env_parse("HTTP_REQUEST_TIMEOUT_SECS", DEFAULT_HTTP_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse("HTTP_CONNECT_TIMEOUT_SECS", DEFAULT_HTTP_CONNECT_TIMEOUT_SECS),
        },
    })
}

fn base_url(raw: Option<String>, default: &str) -> String {
    raw.as_deref()
        .unwrap_or(default)
        .trim_end_matches('/')
        .to_owned()
}

fn default_website_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("website")
}

pub(crate) fn parse_identity_provider(raw: Option<&str>) -> Result<IdentityProviderKind, ConfigError> {
    match raw.unwrap_or("firebase") {
        "firebase" => Ok(IdentityProviderKind::Firebase),
        "memory" => Ok(IdentityProviderKind::Memory),
        other => Err(ConfigError::Invalid { var: "IDENTITY_PROVIDER", value: other.to_owned() }),
    }
}

pub(crate) fn parse_profile_store(raw: Option<&str>) -> Result<ProfileStoreKind, ConfigError> {
    match raw.unwrap_or("firestore") {
        "firestore" => Ok(ProfileStoreKind::Firestore),
        "postgres" => Ok(ProfileStoreKind::Postgres),
        "memory" => Ok(ProfileStoreKind::Memory),
        other => Err(ConfigError::Invalid { var: "PROFILE_STORE", value: other.to_owned() }),
    }
}

/// Non-empty, trimmed env var value.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn env_required(key: &'static str) -> Result<String, ConfigError> {
    env_opt(key).ok_or(ConfigError::Missing { var: key })
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
