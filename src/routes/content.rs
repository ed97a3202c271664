//! Public content routes: landing page, service picker, contact links.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use super::session::existing_session;
use crate::error::{ApiError, ErrorCode};
use crate::services::session::SessionSnapshot;
use crate::state::AppState;
use crate::views::catalog::Platform;
use crate::views::contact::ContactMessage;
use crate::views::landing::{JoinAction, LandingView, join_service};
use crate::views::picker::{PickerError, PickerMode, ServicePicker};

/// Snapshot of the cookie's session, or an anonymous one. Never starts a session.
async fn snapshot_or_anonymous(state: &AppState, jar: &CookieJar) -> SessionSnapshot {
    match existing_session(state, jar).await {
        Some(controller) => controller.snapshot(),
        None => SessionSnapshot { loading: false, ..SessionSnapshot::initial() },
    }
}

#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub link: String,
}

// =============================================================================
// LANDING
// =============================================================================

/// `GET /api/landing`
pub async fn landing(State(state): State<AppState>, jar: CookieJar) -> Json<LandingView> {
    let snapshot = snapshot_or_anonymous(&state, &jar).await;
    Json(LandingView::build(&snapshot, &state.config.whatsapp_number))
}

#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub service: String,
    pub price: String,
}

/// `POST /api/landing/join`: signup prompt or WhatsApp link for a landing card.
pub async fn join(State(state): State<AppState>, jar: CookieJar, Json(body): Json<JoinRequest>) -> Json<JoinAction> {
    let snapshot = snapshot_or_anonymous(&state, &jar).await;
    Json(join_service(&snapshot, &body.service, &body.price, &state.config.whatsapp_number))
}

// =============================================================================
// SERVICE PICKER
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct PickerQuery {
    #[serde(default)]
    pub mode: PickerMode,
}

#[derive(Debug, Serialize)]
pub struct PickerView {
    pub mode: PickerMode,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub platforms: &'static [Platform],
}

/// `GET /api/services?mode=explore|add`
pub async fn services(Query(query): Query<PickerQuery>) -> Json<PickerView> {
    let picker = ServicePicker::open(query.mode);
    Json(PickerView {
        mode: picker.mode,
        title: picker.title(),
        subtitle: picker.subtitle(),
        platforms: picker.platforms(),
    })
}

#[derive(Debug, Deserialize)]
pub struct PlanSelection {
    pub platform: String,
    pub plan: String,
}

fn picker_error(err: &PickerError) -> ApiError {
    let status = match err {
        PickerError::UnknownPlatform(_) | PickerError::UnknownPlan(_) => StatusCode::NOT_FOUND,
        PickerError::NoPlatform => StatusCode::UNPROCESSABLE_ENTITY,
    };
    ApiError::new(status, err.error_code(), err.to_string())
}

/// `POST /api/services/contact`: WhatsApp link for a platform plan.
pub async fn service_contact(
    State(state): State<AppState>,
    Json(body): Json<PlanSelection>,
) -> Result<Json<LinkResponse>, ApiError> {
    let mut picker = ServicePicker::open(PickerMode::Explore);
    picker
        .select_platform(&body.platform)
        .map_err(|e| picker_error(&e))?;
    picker
        .select_plan(&body.plan)
        .map_err(|e| picker_error(&e))?;
    let link = picker
        .request_link(&state.config.whatsapp_number)
        .ok_or_else(|| picker_error(&PickerError::NoPlatform))?;
    Ok(Json(LinkResponse { link }))
}

// =============================================================================
// CONTACT
// =============================================================================

/// `POST /api/contact`: any message template rendered as a WhatsApp link.
pub async fn contact(State(state): State<AppState>, Json(message): Json<ContactMessage>) -> Json<LinkResponse> {
    Json(LinkResponse { link: message.link(&state.config.whatsapp_number) })
}

#[cfg(test)]
#[path = "content_test.rs"]
mod tests;
