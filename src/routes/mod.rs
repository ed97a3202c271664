//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! JSON API under `/api`, a health probe, and the static website as the
//! fallback service. Every API handler works through the caller's browser
//! session (see [`session`]).

pub mod auth;
pub mod content;
pub mod dashboard;
pub mod session;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// API routes without the static fallback.
fn api_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/session", get(session::current))
        .route("/api/auth/form", get(auth::form))
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/dashboard", get(dashboard::dashboard))
        .route("/api/subscriptions", post(dashboard::add_subscription))
        .route("/api/landing", get(content::landing))
        .route("/api/landing/join", post(content::join))
        .route("/api/services", get(content::services))
        .route("/api/services/contact", post(content::service_contact))
        .route("/api/contact", post(content::contact))
        .route("/healthz", get(healthz))
        .layer(cors)
        .with_state(state)
}

/// Full application router: API plus the static website.
pub fn app(state: AppState) -> Router {
    let website = ServeDir::new(&state.config.website_dir).append_index_html_on_directories(true);
    api_routes(state)
        .fallback_service(website)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
