use super::*;
use std::time::Duration;

use axum::response::Response;
use time::OffsetDateTime;

use crate::routes::test_support::{body_json, jar_with, response_cookie};
use crate::services::identity::{IdentityClient, IdentityError};
use crate::services::profile_store::{Profile, ProfileStore, StoreError};
use crate::state::test_helpers::{MemoryApp, memory_app};

fn signup_body(email: &str, password: &str, name: &str, phone: &str) -> SignupRequest {
    SignupRequest {
        email: email.into(),
        password: password.into(),
        display_name: name.into(),
        phone_number: phone.into(),
    }
}

fn login_body(email: &str, password: &str) -> LoginRequest {
    LoginRequest { email: email.into(), password: password.into() }
}

/// Register `email` directly and store its profile.
async fn seed(app: &MemoryApp, email: &str, password: &str, name: &str) {
    let identity = app
        .directory
        .client()
        .create_account(email, password)
        .await
        .unwrap();
    let profile = Profile::new(&identity, name, "+593999999999", OffsetDateTime::now_utc());
    app.store
        .write_document(&identity.uid, &profile)
        .await
        .unwrap();
}

async fn do_signup(app: &MemoryApp, body: SignupRequest) -> Response {
    signup(State(app.state.clone()), CookieJar::new(), Json(body))
        .await
        .into_response()
}

// =============================================================================
// error mapping
// =============================================================================

#[test]
fn identity_kinds_map_to_status() {
    assert_eq!(identity_status(IdentityErrorKind::EmailAlreadyRegistered), StatusCode::CONFLICT);
    assert_eq!(identity_status(IdentityErrorKind::WeakCredential), StatusCode::BAD_REQUEST);
    assert_eq!(identity_status(IdentityErrorKind::MalformedEmail), StatusCode::BAD_REQUEST);
    assert_eq!(identity_status(IdentityErrorKind::AccountNotFound), StatusCode::UNAUTHORIZED);
    assert_eq!(identity_status(IdentityErrorKind::WrongCredential), StatusCode::UNAUTHORIZED);
    assert_eq!(identity_status(IdentityErrorKind::Unknown), StatusCode::BAD_GATEWAY);
}

#[test]
fn identity_error_uses_localized_message() {
    let err = session_error(&SessionError::Identity(IdentityError::new(IdentityErrorKind::WrongCredential, "INVALID_PASSWORD")));
    assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    assert_eq!(err.code, "E_WRONG_CREDENTIAL");
    assert_eq!(err.message, "Contraseña incorrecta");
}

#[test]
fn rejected_records_identity_failure_on_form() {
    let mut form = AuthForm::new(AuthMode::Signup);
    let err = rejected(
        &mut form,
        &SessionError::Identity(IdentityError::new(IdentityErrorKind::EmailAlreadyRegistered, "EMAIL_EXISTS")),
    );
    assert_eq!(err.status, StatusCode::CONFLICT);
    assert_eq!(err.message, "Ya existe una cuenta con este email");
    assert_eq!(form.error.as_deref(), Some("Ya existe una cuenta con este email"));
    assert!(!form.busy);
}

#[test]
fn rejected_store_failure_leaves_form_error_unset() {
    let mut form = AuthForm::new(AuthMode::Signup);
    let err = rejected(&mut form, &SessionError::Store(StoreError::Unauthenticated));
    assert_eq!(err.message, GENERIC_ERROR_MESSAGE);
    assert!(form.error.is_none());
}

#[test]
fn store_error_hides_details() {
    let err = session_error(&SessionError::Store(StoreError::Response { status: 503, body: "backend down".into() }));
    assert_eq!(err.status, StatusCode::BAD_GATEWAY);
    assert_eq!(err.code, "E_STORE_RESPONSE");
    assert_eq!(err.message, GENERIC_ERROR_MESSAGE);
    assert!(err.retryable);
}

#[test]
fn settle_timeout_is_gateway_timeout() {
    let err = session_error(&SessionError::SettleTimeout(Duration::from_millis(10)));
    assert_eq!(err.status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(err.code, "E_SESSION_TIMEOUT");
    assert!(err.retryable);
}

// =============================================================================
// signup
// =============================================================================

#[tokio::test]
async fn signup_creates_profile_and_session() {
    let app = memory_app();
    let response = do_signup(&app, signup_body("ana@example.com", "secret1", "Ana", "+593 999-999-999")).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = response_cookie(&response).expect("session cookie");
    let controller = app
        .state
        .sessions
        .get(cookie.value())
        .await
        .expect("session registered");
    assert!(controller.snapshot().profile.is_some());
    assert_eq!(app.store.len().await, 1);

    let body = body_json(response).await;
    assert_eq!(body["screen"], "dashboard");
    assert_eq!(body["phase"], "authenticated");
    assert_eq!(body["profile"]["displayName"], "Ana");
    assert_eq!(body["profile"]["phoneNumber"], "+593999999999");
    assert_eq!(body["profile"]["subscriptions"], serde_json::json!([]));
    assert!(body["identity"].get("id_token").is_none());
}

#[tokio::test]
async fn signup_rejects_phone_prefix_before_identity_call() {
    let app = memory_app();
    let response = do_signup(&app, signup_body("ana@example.com", "secret1", "Ana", "0999999999")).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(app.directory.is_empty());
    let body = body_json(response).await;
    assert_eq!(body["code"], "E_PHONE_PREFIX");
    assert_eq!(body["message"], "El número debe comenzar con +593");
}

#[tokio::test]
async fn signup_requires_name() {
    let app = memory_app();
    let response = do_signup(&app, signup_body("ana@example.com", "secret1", "  ", "+593999999999")).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "E_NAME_REQUIRED");
    assert!(app.directory.is_empty());
}

#[tokio::test]
async fn signup_duplicate_email_conflicts() {
    let app = memory_app();
    seed(&app, "ana@example.com", "secret1", "Ana").await;

    let response = do_signup(&app, signup_body("ana@example.com", "other12", "Ana", "+593999999999")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["code"], "E_EMAIL_IN_USE");
    assert_eq!(body["message"], "Ya existe una cuenta con este email");
    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn signup_weak_password_is_bad_request() {
    let app = memory_app();
    let response = do_signup(&app, signup_body("ana@example.com", "123", "Ana", "+593999999999")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "La contraseña debe tener al menos 6 caracteres");
    assert!(app.store.is_empty().await);
}

// =============================================================================
// login
// =============================================================================

#[tokio::test]
async fn login_returns_loaded_profile() {
    let app = memory_app();
    seed(&app, "ana@example.com", "secret1", "Ana").await;

    let response = login(State(app.state.clone()), CookieJar::new(), Json(login_body("ana@example.com", "secret1")))
        .await
        .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response_cookie(&response).is_some());
    let body = body_json(response).await;
    assert_eq!(body["screen"], "dashboard");
    assert_eq!(body["identity"]["email"], "ana@example.com");
    assert_eq!(body["profile"]["displayName"], "Ana");
}

#[tokio::test]
async fn login_reuses_existing_session() {
    let app = memory_app();
    seed(&app, "ana@example.com", "secret1", "Ana").await;
    let (token, controller) = app
        .state
        .sessions
        .insert(app.state.backend.start_controller())
        .await;

    let response = login(State(app.state.clone()), jar_with(&token), Json(login_body("ana@example.com", "secret1")))
        .await
        .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response_cookie(&response).is_none());
    assert_eq!(app.state.sessions.len().await, 1);
    assert!(controller.snapshot().profile.is_some());
}

#[tokio::test]
async fn login_wrong_password_is_unauthorized() {
    let app = memory_app();
    seed(&app, "ana@example.com", "secret1", "Ana").await;

    let response = login(State(app.state.clone()), CookieJar::new(), Json(login_body("ana@example.com", "nope123")))
        .await
        .into_response();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["code"], "E_WRONG_CREDENTIAL");
    assert_eq!(body["message"], "Contraseña incorrecta");
}

#[tokio::test]
async fn login_unknown_account_is_unauthorized() {
    let app = memory_app();
    let response = login(State(app.state.clone()), CookieJar::new(), Json(login_body("nobody@example.com", "secret1")))
        .await
        .into_response();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "No existe una cuenta con este email");
}

// =============================================================================
// logout
// =============================================================================

#[tokio::test]
async fn logout_clears_cookie_and_drops_session() {
    let app = memory_app();
    let created = do_signup(&app, signup_body("ana@example.com", "secret1", "Ana", "+593999999999")).await;
    let token = response_cookie(&created)
        .expect("session cookie")
        .value()
        .to_owned();
    let controller = app.state.sessions.get(&token).await.expect("registered");

    let response = logout(State(app.state.clone()), CurrentSession { token: token.clone(), controller })
        .await
        .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    let cleared = response_cookie(&response).expect("clearing cookie");
    assert_eq!(cleared.value(), "");
    assert_eq!(cleared.max_age(), Some(time::Duration::ZERO));
    assert!(app.state.sessions.get(&token).await.is_none());

    let body = body_json(response).await;
    assert_eq!(body["phase"], "anonymous");
    assert!(body["profile"].is_null());
    // The profile document outlives the browser session.
    assert_eq!(app.store.len().await, 1);
}

// =============================================================================
// form copy
// =============================================================================

#[tokio::test]
async fn form_copy_follows_mode() {
    let app = memory_app();
    let Json(view) = form(State(app.state.clone()), Query(FormQuery { mode: AuthMode::Signup, switch: false })).await;
    assert_eq!(view.title, "Crear Cuenta");
    assert_eq!(view.switch_action, "Iniciar sesión");
    assert_eq!(view.phone_prefix, "+593");

    let Json(view) = form(State(app.state), Query(FormQuery { mode: AuthMode::default(), switch: false })).await;
    assert_eq!(view.mode, AuthMode::Login);
    assert_eq!(view.title, "Iniciar Sesión");
}

#[tokio::test]
async fn form_switch_follows_the_link() {
    let app = memory_app();
    let Json(view) = form(State(app.state), Query(FormQuery { mode: AuthMode::Login, switch: true })).await;
    assert_eq!(view.mode, AuthMode::Signup);
    assert_eq!(view.title, "Crear Cuenta");
    assert_eq!(view.switch_question, "¿Ya tienes cuenta?");
}
