use super::*;

fn identity(uid: &str) -> Identity {
    Identity { uid: uid.into(), email: "a@b.com".into(), display_name: None, id_token: "secret-token".into() }
}

// =============================================================================
// normalize_email
// =============================================================================

#[test]
fn normalize_email_lowercases_and_trims() {
    assert_eq!(normalize_email("  Ana@Example.COM "), Some("ana@example.com".into()));
}

#[test]
fn normalize_email_rejects_malformed() {
    for raw in ["", "ana", "@b.com", "ana@", "a@b@c"] {
        assert_eq!(normalize_email(raw), None, "expected rejection for {raw:?}");
    }
}

// =============================================================================
// Identity
// =============================================================================

#[test]
fn identity_debug_redacts_token() {
    let debug = format!("{:?}", identity("u1"));
    assert!(debug.contains("u1"));
    assert!(!debug.contains("secret-token"));
}

#[test]
fn identity_serialization_skips_token() {
    let json = serde_json::to_value(identity("u1")).unwrap();
    assert_eq!(json["uid"], "u1");
    assert!(json.get("id_token").is_none());
}

// =============================================================================
// IdentityError
// =============================================================================

#[test]
fn error_codes_per_kind() {
    let cases = [
        (IdentityErrorKind::AccountNotFound, "E_ACCOUNT_NOT_FOUND"),
        (IdentityErrorKind::WrongCredential, "E_WRONG_CREDENTIAL"),
        (IdentityErrorKind::EmailAlreadyRegistered, "E_EMAIL_IN_USE"),
        (IdentityErrorKind::WeakCredential, "E_WEAK_CREDENTIAL"),
        (IdentityErrorKind::MalformedEmail, "E_INVALID_EMAIL"),
        (IdentityErrorKind::Unknown, "E_IDENTITY"),
    ];
    for (kind, code) in cases {
        assert_eq!(IdentityError::new(kind, "x").error_code(), code);
    }
}

#[test]
fn error_display_includes_kind_and_detail() {
    let err = IdentityError::new(IdentityErrorKind::WeakCredential, "too short");
    assert_eq!(err.to_string(), "weak_credential: too short");
    assert!(!err.retryable());
}

#[test]
fn unknown_constructor_sets_kind() {
    assert_eq!(IdentityError::unknown("boom").kind, IdentityErrorKind::Unknown);
}

// =============================================================================
// SessionChannel
// =============================================================================

#[test]
fn channel_starts_signed_out() {
    let channel = SessionChannel::new();
    assert!(channel.current().is_none());
    assert!(channel.subscribe().borrow().is_none());
}

#[tokio::test]
async fn signed_in_notifies_observers() {
    let channel = SessionChannel::new();
    let mut rx = channel.subscribe();

    channel.signed_in(identity("u1"));
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().as_ref().map(|i| i.uid.clone()), Some("u1".into()));

    channel.signed_out();
    rx.changed().await.unwrap();
    assert!(rx.borrow().is_none());
}

#[test]
fn rename_updates_current_without_notifying() {
    let channel = SessionChannel::new();
    channel.signed_in(identity("u1"));
    let mut rx = channel.subscribe();
    rx.borrow_and_update();

    channel.rename("u1", "Ana");
    assert_eq!(channel.current().unwrap().display_name.as_deref(), Some("Ana"));
    assert!(!rx.has_changed().unwrap());
}

#[test]
fn rename_ignores_other_uid() {
    let channel = SessionChannel::new();
    channel.signed_in(identity("u1"));
    channel.rename("u2", "Bob");
    assert!(channel.current().unwrap().display_name.is_none());
}
