use super::*;
use serde_json::json;
use time::macros::datetime;

fn base_document() -> Value {
    json!({
        "uid": "u1",
        "email": "a@b.com",
        "displayName": "Ana",
        "phoneNumber": "+593999999999",
        "createdAt": "2025-01-01T00:00:00Z",
        "subscriptions": []
    })
}

fn subscription(start: Value, expiry: Value) -> Value {
    json!({
        "id": "1",
        "serviceName": "Netflix",
        "price": "$3.99",
        "status": "active",
        "startDate": start,
        "expiryDate": expiry,
        "slotNumber": 2
    })
}

// =============================================================================
// StoredDate
// =============================================================================

#[test]
fn stored_date_accepts_rfc3339_text() {
    let date: StoredDate = serde_json::from_value(json!("2025-03-15T10:30:00Z")).unwrap();
    assert_eq!(date.resolve(), Some(datetime!(2025-03-15 10:30 UTC)));
}

#[test]
fn stored_date_accepts_millis() {
    let date: StoredDate = serde_json::from_value(json!(1_735_689_600_000_i64)).unwrap();
    assert_eq!(date.resolve(), Some(datetime!(2025-01-01 0:00 UTC)));
}

#[test]
fn stored_date_accepts_fractional_millis() {
    let date: StoredDate = serde_json::from_value(json!(1_735_689_600_000.75_f64)).unwrap();
    assert_eq!(date, StoredDate::MillisFloat(1_735_689_600_000.75));
    assert_eq!(date.resolve(), Some(datetime!(2025-01-01 0:00 UTC)));

    let before_epoch: StoredDate = serde_json::from_value(json!(-1.5_f64)).unwrap();
    assert_eq!(before_epoch.resolve(), Some(datetime!(1969-12-31 23:59:59.999 UTC)));
}

#[test]
fn stored_date_float_out_of_range_is_unresolved() {
    let date: StoredDate = serde_json::from_value(json!(1e17_f64)).unwrap();
    assert_eq!(date.resolve(), None);
}

#[test]
fn stored_date_accepts_timestamp_object() {
    let date: StoredDate = serde_json::from_value(json!({ "seconds": 1_735_689_600, "nanoseconds": 500 })).unwrap();
    assert_eq!(date.resolve(), datetime!(2025-01-01 0:00 UTC).replace_nanosecond(500).ok());
}

#[test]
fn stored_date_garbage_is_unreadable() {
    let date: StoredDate = serde_json::from_value(json!(true)).unwrap();
    assert_eq!(date, StoredDate::Unreadable(json!(true)));
    assert_eq!(date.resolve(), None);

    let text: StoredDate = serde_json::from_value(json!("next tuesday")).unwrap();
    assert_eq!(text.resolve(), None);
}

// =============================================================================
// Profile::from_document
// =============================================================================

#[test]
fn from_document_reads_all_fields() {
    let mut doc = base_document();
    doc["subscriptions"] = json!([subscription(json!("2025-03-01T00:00:00Z"), json!("2025-04-01T00:00:00Z"))]);

    let profile = Profile::from_document(doc).unwrap();
    assert_eq!(profile.uid, "u1");
    assert_eq!(profile.display_name, "Ana");
    assert_eq!(profile.created_at, datetime!(2025-01-01 0:00 UTC));
    let sub = &profile.subscriptions[0];
    assert_eq!(sub.status, SubscriptionStatus::Active);
    assert_eq!(sub.start_date, datetime!(2025-03-01 0:00 UTC));
    assert_eq!(sub.expiry_date, datetime!(2025-04-01 0:00 UTC));
    assert_eq!(sub.slot_number, 2);
}

#[test]
fn missing_subscriptions_become_empty_list() {
    let mut doc = base_document();
    doc.as_object_mut().unwrap().remove("subscriptions");
    assert!(Profile::from_document(doc).unwrap().subscriptions.is_empty());
}

#[test]
fn missing_created_at_becomes_now() {
    let mut doc = base_document();
    doc.as_object_mut().unwrap().remove("createdAt");

    let before = OffsetDateTime::now_utc();
    let profile = Profile::from_document(doc).unwrap();
    assert!(profile.created_at >= before);
}

#[test]
fn unreadable_subscription_dates_become_epoch() {
    let mut doc = base_document();
    doc["subscriptions"] = json!([subscription(json!(null), json!("soon"))]);

    let sub = &Profile::from_document(doc).unwrap().subscriptions[0];
    assert_eq!(sub.start_date, OffsetDateTime::UNIX_EPOCH);
    assert_eq!(sub.expiry_date, OffsetDateTime::UNIX_EPOCH);
}

#[test]
fn missing_uid_is_decode_error() {
    let mut doc = base_document();
    doc.as_object_mut().unwrap().remove("uid");
    assert!(matches!(Profile::from_document(doc), Err(StoreError::Decode(_))));
}

#[test]
fn unknown_status_is_decode_error() {
    let mut doc = base_document();
    let mut sub = subscription(json!("2025-03-01T00:00:00Z"), json!("2025-04-01T00:00:00Z"));
    sub["status"] = json!("cancelled");
    doc["subscriptions"] = json!([sub]);
    assert!(matches!(Profile::from_document(doc), Err(StoreError::Decode(_))));
}

// =============================================================================
// Profile::to_document
// =============================================================================

#[test]
fn to_document_uses_camel_case_and_rfc3339() {
    let identity = Identity { uid: "u1".into(), email: "a@b.com".into(), display_name: None, id_token: String::new() };
    let mut profile = Profile::new(&identity, "Ana", "+593999999999", datetime!(2025-01-01 0:00 UTC));
    profile.subscriptions.push(
        NewSubscription {
            service_name: "Netflix".into(),
            price: "$3.99".into(),
            status: SubscriptionStatus::Pending,
            start_date: datetime!(2025-03-01 0:00 UTC),
            expiry_date: datetime!(2025-04-01 0:00 UTC),
            slot_number: 2,
        }
        .with_id("42".into()),
    );

    let doc = profile.to_document().unwrap();
    assert_eq!(doc["displayName"], "Ana");
    assert_eq!(doc["phoneNumber"], "+593999999999");
    assert_eq!(doc["createdAt"], "2025-01-01T00:00:00Z");
    assert_eq!(doc["subscriptions"][0]["id"], "42");
    assert_eq!(doc["subscriptions"][0]["status"], "pending");
    assert_eq!(doc["subscriptions"][0]["slotNumber"], 2);
    assert_eq!(Profile::from_document(doc).unwrap(), profile);
}

// =============================================================================
// StoreError
// =============================================================================

#[test]
fn store_error_codes_and_retryable() {
    assert_eq!(StoreError::Unauthenticated.error_code(), "E_STORE_UNAUTHENTICATED");
    assert!(!StoreError::Unauthenticated.retryable());
    assert!(StoreError::Request("timeout".into()).retryable());
    assert!(StoreError::Response { status: 503, body: String::new() }.retryable());
    assert!(StoreError::Response { status: 429, body: String::new() }.retryable());
    assert!(!StoreError::Response { status: 403, body: String::new() }.retryable());
    assert!(!StoreError::Decode("bad".into()).retryable());
}
