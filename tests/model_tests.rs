use rental_portal::auth::{Role, SessionRecord};
use rental_portal::models::{Coupon, ErrorResponse, Order, ORDER_STATUSES};

// --- Role ---

#[test]
fn role_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""admin""#);
    assert_eq!(serde_json::to_string(&Role::Vendor).unwrap(), r#""vendor""#);
}

#[test]
fn role_deserializes_from_the_wire_names() {
    assert_eq!(serde_json::from_str::<Role>(r#""admin""#).unwrap(), Role::Admin);
    assert_eq!(serde_json::from_str::<Role>(r#""vendor""#).unwrap(), Role::Vendor);
}

#[test]
fn role_rejects_anything_outside_the_closed_set() {
    assert!(serde_json::from_str::<Role>(r#""superuser""#).is_err());
    assert!(serde_json::from_str::<Role>(r#""Admin""#).is_err());
    assert!(serde_json::from_str::<Role>(r#""""#).is_err());
}

#[test]
fn role_home_paths_are_fixed() {
    assert_eq!(Role::Admin.home_path(), "/admin/dashboard");
    assert_eq!(Role::Vendor.home_path(), "/vendor/dashboard");
}

// --- Session Record ---

#[test]
fn session_record_parses_the_cookie_shape() {
    let raw = r#"{
        "user": {
            "id": "00000000-0000-0000-0000-000000000007",
            "email": "vera@rental.test",
            "type": "vendor",
            "is_verified": true
        },
        "timestamp": 1754000000000
    }"#;

    let record: SessionRecord = serde_json::from_str(raw).unwrap();
    assert_eq!(record.user.role, Role::Vendor);
    assert_eq!(record.user.email, "vera@rental.test");
    assert!(record.user.is_verified);
    assert_eq!(record.timestamp, 1_754_000_000_000);
}

#[test]
fn session_record_requires_every_field() {
    // No timestamp: the record cannot be freshness-checked, so parsing fails
    // and the caller falls back to "no identity".
    let raw = r#"{"user":{"id":"00000000-0000-0000-0000-000000000007","email":"v@r.t","type":"vendor","is_verified":true}}"#;
    assert!(serde_json::from_str::<SessionRecord>(raw).is_err());
}

#[test]
fn session_record_round_trips() {
    let raw = r#"{"user":{"id":"00000000-0000-0000-0000-000000000001","email":"a@r.t","type":"admin","is_verified":false},"timestamp":5}"#;
    let record: SessionRecord = serde_json::from_str(raw).unwrap();
    let back = serde_json::to_string(&record).unwrap();

    // The role field keeps its on-the-wire name through a round trip.
    assert!(back.contains(r#""type":"admin""#));
    assert!(back.contains(r#""timestamp":5"#));
}

// --- Domain Models ---

#[test]
fn order_statuses_form_the_closed_lifecycle() {
    assert_eq!(ORDER_STATUSES, ["pending", "confirmed", "returned", "cancelled"]);
    assert!(!ORDER_STATUSES.contains(&"teleported"));
}

#[test]
fn order_serializes_dates_as_iso_strings() {
    let mut order = Order::default();
    order.rental_start = chrono::NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
    order.rental_end = chrono::NaiveDate::from_ymd_opt(2026, 6, 8).unwrap();

    let json = serde_json::to_value(&order).unwrap();
    assert_eq!(json["rental_start"], "2026-06-01");
    assert_eq!(json["rental_end"], "2026-06-08");
}

#[test]
fn coupon_with_no_expiry_serializes_null() {
    let coupon = Coupon::default();
    let json = serde_json::to_value(&coupon).unwrap();
    assert!(json["expires_at"].is_null());
}

#[test]
fn error_response_omits_an_absent_detail() {
    let plain = serde_json::to_value(ErrorResponse::new("nope")).unwrap();
    assert_eq!(plain["message"], "nope");
    assert!(plain.get("detail").is_none());

    let detailed =
        serde_json::to_value(ErrorResponse::with_detail("nope", "pool timeout".to_string()))
            .unwrap();
    assert_eq!(detailed["detail"], "pool timeout");
}
