use super::*;
use std::sync::Arc;

use axum::response::IntoResponse;
use time::macros::datetime;

use crate::routes::test_support::body_json;
use crate::services::profile_store::SubscriptionStatus;
use crate::state::test_helpers::{MemoryApp, memory_app};

fn netflix() -> NewSubscription {
    NewSubscription {
        service_name: "Netflix Premium".into(),
        price: "$4.99".into(),
        status: SubscriptionStatus::Active,
        start_date: datetime!(2025-03-01 0:00 UTC),
        expiry_date: datetime!(2025-04-01 0:00 UTC),
        slot_number: 3,
    }
}

async fn anonymous_session(app: &MemoryApp) -> CurrentSession {
    let (token, controller) = app
        .state
        .sessions
        .insert(app.state.backend.start_controller())
        .await;
    CurrentSession { token, controller }
}

async fn signed_in_session(app: &MemoryApp) -> CurrentSession {
    let session = anonymous_session(app).await;
    session
        .controller
        .signup("ana@example.com", "secret1", "Ana", "+593999999999")
        .await
        .unwrap();
    session
}

#[tokio::test]
async fn dashboard_requires_identity() {
    let app = memory_app();
    let session = anonymous_session(&app).await;

    let err = dashboard(State(app.state.clone()), session)
        .await
        .err()
        .expect("unauthorized");
    assert_eq!(err.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn dashboard_renders_signed_in_profile() {
    let app = memory_app();
    let session = signed_in_session(&app).await;

    let Json(view) = dashboard(State(app.state.clone()), session)
        .await
        .ok()
        .expect("dashboard");
    assert_eq!(view.greeting, "¡Hola, Ana!");
    assert_eq!(view.email, "ana@example.com");
    assert!(view.empty);
    assert_eq!(view.monthly_cost_label, "$0.00");
}

#[tokio::test]
async fn add_subscription_appends_and_persists() {
    let app = memory_app();
    let session = signed_in_session(&app).await;
    let controller = Arc::clone(&session.controller);

    let response = add_subscription(session, Json(netflix()))
        .await
        .into_response();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["serviceName"], "Netflix Premium");
    assert_eq!(body["slotNumber"], 3);
    assert!(body["id"].as_str().is_some_and(|id| !id.is_empty()));

    let profile = controller.snapshot().profile.expect("profile");
    assert_eq!(profile.subscriptions.len(), 1);
    let stored = app.store.raw(&profile.uid).await.expect("stored document");
    assert_eq!(stored["subscriptions"][0]["serviceName"], "Netflix Premium");
}

#[tokio::test]
async fn add_subscription_shows_on_dashboard() {
    let app = memory_app();
    let session = signed_in_session(&app).await;
    let again = CurrentSession { token: session.token.clone(), controller: Arc::clone(&session.controller) };

    add_subscription(session, Json(netflix()))
        .await
        .ok()
        .expect("added");
    let Json(view) = dashboard(State(app.state.clone()), again)
        .await
        .ok()
        .expect("dashboard");

    assert_eq!(view.active_count, 1);
    assert_eq!(view.monthly_cost_label, "$4.99");
    assert_eq!(view.subscriptions[0].slot_label, "Slot #3");
}

#[tokio::test]
async fn add_subscription_signed_out_is_unauthorized() {
    let app = memory_app();
    let session = anonymous_session(&app).await;

    let err = add_subscription(session, Json(netflix()))
        .await
        .err()
        .expect("unauthorized");
    assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    assert!(app.store.is_empty().await);
}
