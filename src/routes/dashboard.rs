//! Dashboard routes for the signed-in user.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;

use super::auth::session_error;
use super::session::CurrentSession;
use crate::error::ApiError;
use crate::services::profile_store::{NewSubscription, Subscription};
use crate::state::AppState;
use crate::views::dashboard::DashboardView;

/// `GET /api/dashboard`: dashboard view, 401 when signed out.
pub async fn dashboard(State(state): State<AppState>, session: CurrentSession) -> Result<Json<DashboardView>, ApiError> {
    let snapshot = session.controller.snapshot();
    let identity = snapshot
        .identity
        .as_ref()
        .ok_or_else(ApiError::unauthorized)?;
    Ok(Json(DashboardView::build(identity, snapshot.profile.as_ref(), &state.config.whatsapp_number)))
}

/// `POST /api/subscriptions`: append a subscription to the current profile.
pub async fn add_subscription(
    session: CurrentSession,
    Json(body): Json<NewSubscription>,
) -> Result<(StatusCode, Json<Subscription>), ApiError> {
    let added = session
        .controller
        .add_subscription(body)
        .await
        .map_err(|e| session_error(&e))?;
    let subscription = added.ok_or_else(ApiError::unauthorized)?;
    Ok((StatusCode::CREATED, Json(subscription)))
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
