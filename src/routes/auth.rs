//! Auth routes: signup, login, logout, and form copy.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use super::session::{CurrentSession, SessionView, clear_cookie, open_session};
use crate::error::{ApiError, ErrorCode};
use crate::services::identity::IdentityErrorKind;
use crate::services::session::SessionError;
use crate::state::AppState;
use crate::views::auth_form::{AuthForm, AuthMode, GENERIC_ERROR_MESSAGE, Submission, identity_error_message};

// =============================================================================
// ERROR MAPPING
// =============================================================================

fn identity_status(kind: IdentityErrorKind) -> StatusCode {
    match kind {
        IdentityErrorKind::EmailAlreadyRegistered => StatusCode::CONFLICT,
        IdentityErrorKind::WeakCredential | IdentityErrorKind::MalformedEmail => StatusCode::BAD_REQUEST,
        IdentityErrorKind::AccountNotFound | IdentityErrorKind::WrongCredential => StatusCode::UNAUTHORIZED,
        IdentityErrorKind::Unknown => StatusCode::BAD_GATEWAY,
    }
}

/// Map a controller failure to the JSON error shown on the form.
pub(crate) fn session_error(err: &SessionError) -> ApiError {
    match err {
        SessionError::Identity(e) => {
            if e.kind == IdentityErrorKind::Unknown {
                tracing::warn!(error = %e, "identity provider error");
            }
            ApiError::from_code(identity_status(e.kind), e, identity_error_message(e.kind))
        }
        SessionError::Store(e) => {
            tracing::error!(error = %e, code = e.error_code(), "profile store error");
            ApiError::from_code(StatusCode::BAD_GATEWAY, e, GENERIC_ERROR_MESSAGE)
        }
        SessionError::SettleTimeout(_) => {
            tracing::warn!(error = %err, "session did not settle");
            ApiError::from_code(StatusCode::GATEWAY_TIMEOUT, err, GENERIC_ERROR_MESSAGE)
        }
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub phone_number: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fn submit(form: &mut AuthForm, phone_prefix: &str) -> Result<Submission, ApiError> {
    form.begin_submit(phone_prefix)
        .map_err(|e| ApiError::from_code(StatusCode::UNPROCESSABLE_ENTITY, &e, e.to_string()))
}

/// Controller failure at the form boundary. Identity failures are recorded
/// on the form and answered with the form's message.
fn rejected(form: &mut AuthForm, err: &SessionError) -> ApiError {
    let mut error = session_error(err);
    if let SessionError::Identity(e) = err {
        form.fail(e.kind);
        if let Some(message) = form.error.clone() {
            error.message = message;
        }
    }
    error
}

/// `POST /api/auth/signup`: validate, create the account and its profile.
pub async fn signup(State(state): State<AppState>, jar: CookieJar, Json(body): Json<SignupRequest>) -> impl IntoResponse {
    let (jar, controller) = open_session(&state, jar).await;

    let mut form = AuthForm::new(AuthMode::Signup);
    form.email = body.email;
    form.password = body.password;
    form.display_name = body.display_name;
    form.set_phone_number(&body.phone_number);

    let result = async {
        let Submission::Signup { email, password, display_name, phone_number } =
            submit(&mut form, &state.config.phone_prefix)?
        else {
            return Err(ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, "E_FORM_MODE", GENERIC_ERROR_MESSAGE));
        };
        controller
            .signup(&email, &password, &display_name, &phone_number)
            .await
            .map_err(|e| rejected(&mut form, &e))?;
        Ok::<_, ApiError>((StatusCode::CREATED, Json(SessionView::from(controller.snapshot()))))
    }
    .await;

    (jar, result)
}

/// `POST /api/auth/login`: authenticate, then wait for the profile to load.
pub async fn login(State(state): State<AppState>, jar: CookieJar, Json(body): Json<LoginRequest>) -> impl IntoResponse {
    let (jar, controller) = open_session(&state, jar).await;

    let mut form = AuthForm::new(AuthMode::Login);
    form.email = body.email;
    form.password = body.password;

    let result = async {
        let Submission::Login { email, password } = submit(&mut form, &state.config.phone_prefix)? else {
            return Err(ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, "E_FORM_MODE", GENERIC_ERROR_MESSAGE));
        };
        let identity = controller
            .login(&email, &password)
            .await
            .map_err(|e| rejected(&mut form, &e))?;
        let snapshot = match controller.settle(&identity.uid, state.settle_timeout()).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(uid = %identity.uid, error = %e, "login answered before profile load");
                controller.snapshot()
            }
        };
        Ok::<_, ApiError>(Json(SessionView::from(snapshot)))
    }
    .await;

    (jar, result)
}

/// `POST /api/auth/logout`: sign out, drop the browser session, clear cookie.
pub async fn logout(State(state): State<AppState>, session: CurrentSession) -> impl IntoResponse {
    let result = session.controller.logout().await;
    let snapshot = session.controller.snapshot();
    state.sessions.remove(&session.token).await;

    let jar = CookieJar::new().add(clear_cookie(state.config.cookie_secure));
    match result {
        Ok(()) => (jar, Json(SessionView::from(snapshot))).into_response(),
        Err(e) => (jar, session_error(&e)).into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct FormQuery {
    #[serde(default)]
    pub mode: AuthMode,
    /// Follow the "switch mode" link from `mode`.
    #[serde(default)]
    pub switch: bool,
}

/// Copy for the auth modal in the requested mode.
#[derive(Debug, Serialize)]
pub struct AuthFormView {
    pub mode: AuthMode,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub switch_question: &'static str,
    pub switch_action: &'static str,
    pub phone_prefix: String,
}

/// `GET /api/auth/form?mode=login|signup&switch=true|false`
pub async fn form(State(state): State<AppState>, Query(query): Query<FormQuery>) -> Json<AuthFormView> {
    let mut form = AuthForm::new(query.mode);
    if query.switch {
        form.switch_mode();
    }
    let (switch_question, switch_action) = form.switch_prompt();
    Json(AuthFormView {
        mode: form.mode,
        title: form.title(),
        subtitle: form.subtitle(),
        switch_question,
        switch_action,
        phone_prefix: state.config.phone_prefix.clone(),
    })
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
