use super::*;

fn config() -> FirebaseConfig {
    FirebaseConfig {
        api_key: "key123".into(),
        project_id: "vacapp-demo".into(),
        auth_base_url: "https://identitytoolkit.googleapis.com/v1".into(),
        firestore_base_url: "https://firestore.googleapis.com/v1".into(),
        database: "(default)".into(),
        collection: "users".into(),
        timeouts: HttpTimeouts::default(),
    }
}

// =============================================================================
// map_auth_error
// =============================================================================

#[test]
fn map_auth_error_known_codes() {
    let cases = [
        ("EMAIL_NOT_FOUND", IdentityErrorKind::AccountNotFound),
        ("USER_NOT_FOUND", IdentityErrorKind::AccountNotFound),
        ("INVALID_PASSWORD", IdentityErrorKind::WrongCredential),
        ("INVALID_LOGIN_CREDENTIALS", IdentityErrorKind::WrongCredential),
        ("EMAIL_EXISTS", IdentityErrorKind::EmailAlreadyRegistered),
        ("INVALID_EMAIL", IdentityErrorKind::MalformedEmail),
        ("MISSING_EMAIL", IdentityErrorKind::MalformedEmail),
    ];
    for (message, kind) in cases {
        assert_eq!(map_auth_error(message), kind, "{message}");
    }
}

#[test]
fn map_auth_error_strips_detail_suffix() {
    assert_eq!(
        map_auth_error("WEAK_PASSWORD : Password should be at least 6 characters"),
        IdentityErrorKind::WeakCredential
    );
}

#[test]
fn map_auth_error_unknown_code() {
    assert_eq!(map_auth_error("TOO_MANY_ATTEMPTS_TRY_LATER"), IdentityErrorKind::Unknown);
    assert_eq!(map_auth_error(""), IdentityErrorKind::Unknown);
}

// =============================================================================
// URLs
// =============================================================================

#[test]
fn auth_endpoint_carries_api_key() {
    let client = FirebaseAuthClient::new(reqwest::Client::new(), &config());
    assert_eq!(
        client.endpoint("signUp"),
        "https://identitytoolkit.googleapis.com/v1/accounts:signUp?key=key123"
    );
}

#[test]
fn document_urls() {
    assert_eq!(
        documents_url(&config()),
        "https://firestore.googleapis.com/v1/projects/vacapp-demo/databases/(default)/documents"
    );
    let (_tx, rx) = watch::channel(None);
    let store = FirestoreProfileStore::new(reqwest::Client::new(), &config(), rx);
    assert!(store.document_url("u1").ends_with("/documents/users/u1"));
}

#[tokio::test]
async fn store_without_identity_is_unauthenticated() {
    let (_tx, rx) = watch::channel(None);
    let store = FirestoreProfileStore::new(reqwest::Client::new(), &config(), rx);

    let err = store.read_document("u1").await.unwrap_err();
    assert!(matches!(err, StoreError::Unauthenticated));
}

#[test]
fn store_uses_current_identity_token() {
    let identity = Identity { uid: "u1".into(), email: "a@b.com".into(), display_name: None, id_token: "tok".into() };
    let (tx, rx) = watch::channel(None);
    let store = FirestoreProfileStore::new(reqwest::Client::new(), &config(), rx);

    tx.send_replace(Some(identity));
    assert_eq!(store.bearer().unwrap(), "tok");
    tx.send_replace(None);
    assert!(store.bearer().is_err());
}

// =============================================================================
// VALUE CODEC
// =============================================================================

#[test]
fn encode_scalars() {
    assert_eq!(encode_value(&json!(null)), json!({ "nullValue": null }));
    assert_eq!(encode_value(&json!(true)), json!({ "booleanValue": true }));
    assert_eq!(encode_value(&json!(2)), json!({ "integerValue": "2" }));
    assert_eq!(encode_value(&json!(2.5)), json!({ "doubleValue": 2.5 }));
    assert_eq!(encode_value(&json!("Ana")), json!({ "stringValue": "Ana" }));
}

#[test]
fn encode_document_nests_maps_and_arrays() {
    let doc = json_to_document(&json!({ "subscriptions": [{ "slotNumber": 2 }] })).unwrap();
    assert_eq!(
        doc,
        json!({
            "fields": {
                "subscriptions": { "arrayValue": { "values": [
                    { "mapValue": { "fields": { "slotNumber": { "integerValue": "2" } } } }
                ] } }
            }
        })
    );
}

#[test]
fn encode_document_requires_object() {
    assert!(matches!(json_to_document(&json!([1])), Err(StoreError::Decode(_))));
}

#[test]
fn decode_firestore_document() {
    let document = json!({
        "name": "projects/p/databases/(default)/documents/users/u1",
        "fields": {
            "uid": { "stringValue": "u1" },
            "createdAt": { "timestampValue": "2025-01-01T00:00:00Z" },
            "subscriptions": { "arrayValue": {} },
            "tags": { "mapValue": {} },
            "slot": { "integerValue": "7" },
            "ratio": { "doubleValue": 0.5 },
            "gone": { "nullValue": null }
        }
    });
    assert_eq!(
        document_to_json(&document).unwrap(),
        json!({
            "uid": "u1",
            "createdAt": "2025-01-01T00:00:00Z",
            "subscriptions": [],
            "tags": {},
            "slot": 7,
            "ratio": 0.5,
            "gone": null
        })
    );
}

#[test]
fn decode_document_without_fields_is_empty_object() {
    assert_eq!(document_to_json(&json!({ "name": "x" })).unwrap(), json!({}));
}

#[test]
fn decode_rejects_unknown_type_and_bad_integer() {
    assert!(decode_value(&json!({ "vectorValue": {} })).is_err());
    assert!(decode_value(&json!({ "integerValue": "seven" })).is_err());
    assert!(decode_value(&json!("bare")).is_err());
}

#[test]
fn profile_survives_firestore_encoding() {
    let identity = Identity { uid: "u1".into(), email: "a@b.com".into(), display_name: None, id_token: String::new() };
    let profile = Profile::new(
        &identity,
        "Ana",
        "+593999999999",
        time::macros::datetime!(2025-01-01 0:00 UTC),
    );

    let encoded = json_to_document(&profile.to_document().unwrap()).unwrap();
    let decoded = Profile::from_document(document_to_json(&encoded).unwrap()).unwrap();
    assert_eq!(decoded, profile);
}

#[test]
fn double_valued_dates_keep_their_instant() {
    let document = json!({
        "fields": {
            "uid": { "stringValue": "u1" },
            "email": { "stringValue": "a@b.com" },
            "createdAt": { "doubleValue": 1_735_689_600_000.0_f64 }
        }
    });
    let profile = Profile::from_document(document_to_json(&document).unwrap()).unwrap();
    assert_eq!(profile.created_at, time::macros::datetime!(2025-01-01 0:00 UTC));
}
