//! Error codes and the JSON error body returned by HTTP routes.
//!
//! DESIGN
//! ======
//! Service errors stay typed (`thiserror` enums per service). Each one
//! implements [`ErrorCode`] so routes can emit a grepable `E_*` code next to
//! the user-facing message without matching on every variant twice.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

/// Grepable error code and retryable flag for structured error bodies.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// Error body sent to the browser: `{ "code": "E_...", "message": "..." }`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub retryable: bool,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self { status, code, message: message.into(), retryable: false }
    }

    /// Build from a typed error, replacing its internal text with `message`.
    pub fn from_code(status: StatusCode, err: &impl ErrorCode, message: impl Into<String>) -> Self {
        Self { status, code: err.error_code(), message: message.into(), retryable: err.retryable() }
    }

    #[must_use]
    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "E_UNAUTHENTICATED", "Inicia sesión para continuar")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
