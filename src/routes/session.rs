//! Browser sessions: cookie handling, the session extractor, `GET /api/session`.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts, State};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use time::Duration;

use crate::error::ApiError;
use crate::services::session::{SessionController, SessionPhase, SessionSnapshot};
use crate::state::AppState;
use crate::views::screen::Screen;

pub const COOKIE_NAME: &str = "vacapp_session";

// =============================================================================
// COOKIES
// =============================================================================

fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

pub(crate) fn clear_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}

fn cookie_token(jar: &CookieJar) -> Option<&str> {
    jar.get(COOKIE_NAME)
        .map(Cookie::value)
        .filter(|t| !t.is_empty())
}

/// Controller for the cookie's session, if it is still registered.
pub(crate) async fn existing_session(state: &AppState, jar: &CookieJar) -> Option<Arc<SessionController>> {
    let token = cookie_token(jar)?;
    state.sessions.get(token).await
}

/// Resolve the browser's session, starting a new one (and setting its
/// cookie) when the cookie is missing or its session has expired.
pub(crate) async fn open_session(state: &AppState, jar: CookieJar) -> (CookieJar, Arc<SessionController>) {
    if let Some(controller) = existing_session(state, &jar).await {
        return (jar, controller);
    }
    let (token, controller) = state
        .sessions
        .insert(state.backend.start_controller())
        .await;
    tracing::debug!("browser session started");
    (jar.add(session_cookie(token, state.config.cookie_secure)), controller)
}

// =============================================================================
// EXTRACTOR
// =============================================================================

/// Registered browser session. Rejects with 401 when there is none.
pub struct CurrentSession {
    pub token: String,
    pub controller: Arc<SessionController>,
}

impl<S> FromRequestParts<S> for CurrentSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = cookie_token(&jar).ok_or_else(ApiError::unauthorized)?;
        let app_state = AppState::from_ref(state);
        let controller = app_state
            .sessions
            .get(token)
            .await
            .ok_or_else(ApiError::unauthorized)?;
        Ok(Self { token: token.to_owned(), controller })
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// Session state as seen by the browser.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub screen: Screen,
    pub phase: SessionPhase,
    #[serde(flatten)]
    pub snapshot: SessionSnapshot,
}

impl From<SessionSnapshot> for SessionView {
    fn from(snapshot: SessionSnapshot) -> Self {
        Self { screen: Screen::select(&snapshot), phase: snapshot.phase(), snapshot }
    }
}

/// `GET /api/session`: current session, starting one if needed.
///
/// Waits briefly for the first identity notification so a fresh session
/// does not always answer `loading`.
pub async fn current(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let (jar, controller) = open_session(&state, jar).await;
    let snapshot = match tokio::time::timeout(state.settle_timeout(), controller.ready()).await {
        Ok(snapshot) => snapshot,
        Err(_) => controller.snapshot(),
    };
    (jar, Json(SessionView::from(snapshot)))
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
