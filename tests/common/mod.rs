#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, header};
use rental_portal::{
    AppState,
    config::AppConfig,
    email::MockMailer,
    imagehost::MockImageHost,
    models::{
        AdminDashboardStats, Coupon, CreateCouponRequest, CreateOrderRequest, Order, Tag,
        VendorDashboardStats,
    },
    repository::Repository,
};
use std::sync::Arc;
use uuid::Uuid;

/// Fixed identities used across the test suite.
pub const ADMIN_ID: Uuid = Uuid::from_u128(1);
pub const VENDOR_ID: Uuid = Uuid::from_u128(7);

// --- Mock Repository ---

/// MockRepo
///
/// In-memory stand-in for the Postgres repository. Each field cans the response
/// for the method group a test wants to steer; everything else answers with the
/// "empty database" defaults.
pub struct MockRepo {
    /// Returned by get_coupon_by_code.
    pub coupon_to_return: Option<Coupon>,
    /// Returned by create_coupon; None simulates a code conflict.
    pub create_coupon_result: Option<Coupon>,
    /// Returned by create_tag; None simulates a name conflict.
    pub create_tag_result: Option<Tag>,
    /// Returned by get_order and used as the base row for status updates.
    pub order_to_return: Option<Order>,
    /// Result of delete_coupon/delete_tag.
    pub delete_result: bool,
    /// Result of record_coupon_usage.
    pub usage_result: bool,
}

impl Default for MockRepo {
    fn default() -> Self {
        Self {
            coupon_to_return: None,
            create_coupon_result: None,
            create_tag_result: None,
            order_to_return: None,
            delete_result: false,
            usage_result: true,
        }
    }
}

#[async_trait]
impl Repository for MockRepo {
    async fn create_coupon(&self, _req: CreateCouponRequest) -> Option<Coupon> {
        self.create_coupon_result.clone()
    }

    async fn list_coupons(&self) -> Vec<Coupon> {
        self.coupon_to_return.clone().into_iter().collect()
    }

    async fn get_coupon_by_code(&self, _code: &str) -> Option<Coupon> {
        self.coupon_to_return.clone()
    }

    async fn delete_coupon(&self, _id: Uuid) -> bool {
        self.delete_result
    }

    async fn record_coupon_usage(&self, _coupon_id: Uuid, _order_id: Option<Uuid>) -> bool {
        self.usage_result
    }

    async fn create_order(&self, req: CreateOrderRequest) -> Option<Order> {
        // Echo the payload back as a persisted row, the way the insert's
        // RETURNING clause would.
        Some(Order {
            id: Uuid::new_v4(),
            vendor_id: req.vendor_id,
            customer_name: req.customer_name,
            customer_email: req.customer_email,
            product_name: req.product_name,
            quantity: req.quantity,
            rental_start: req.rental_start,
            rental_end: req.rental_end,
            total_cents: req.total_cents,
            coupon_code: req.coupon_code,
            status: "pending".to_string(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        })
    }

    async fn get_order(&self, _id: Uuid) -> Option<Order> {
        self.order_to_return.clone()
    }

    async fn list_orders(&self, _status: Option<String>, _vendor: Option<Uuid>) -> Vec<Order> {
        self.order_to_return.clone().into_iter().collect()
    }

    async fn list_vendor_orders(&self, vendor_id: Uuid) -> Vec<Order> {
        self.order_to_return
            .clone()
            .into_iter()
            .filter(|o| o.vendor_id == vendor_id)
            .collect()
    }

    async fn set_order_status(&self, _id: Uuid, vendor_id: Uuid, status: &str) -> Option<Order> {
        // Mirror the ownership semantics of the real UPDATE ... WHERE vendor_id
        // query: a foreign order is indistinguishable from a missing one.
        self.order_to_return
            .clone()
            .filter(|o| o.vendor_id == vendor_id)
            .map(|mut o| {
                o.status = status.to_string();
                o
            })
    }

    async fn set_order_status_admin(&self, _id: Uuid, status: &str) -> Option<Order> {
        self.order_to_return.clone().map(|mut o| {
            o.status = status.to_string();
            o
        })
    }

    async fn create_tag(&self, _name: &str) -> Option<Tag> {
        self.create_tag_result.clone()
    }

    async fn list_tags(&self) -> Vec<Tag> {
        vec![]
    }

    async fn delete_tag(&self, _id: Uuid) -> bool {
        self.delete_result
    }

    async fn admin_stats(&self) -> AdminDashboardStats {
        AdminDashboardStats::default()
    }

    async fn vendor_stats(&self, vendor_id: Uuid) -> VendorDashboardStats {
        VendorDashboardStats { vendor_id, ..Default::default() }
    }
}

// --- State & Request Helpers ---

/// Assembles an AppState over the given mocks with the safe default config.
pub fn state_with(repo: MockRepo, mailer: MockMailer, images: MockImageHost) -> AppState {
    AppState {
        repo: Arc::new(repo),
        images: Arc::new(images),
        mailer: Arc::new(mailer),
        config: AppConfig::default(),
    }
}

/// AppState with all-default mocks, for tests that only exercise the gate.
pub fn test_state() -> AppState {
    state_with(MockRepo::default(), MockMailer::new(), MockImageHost::new())
}

/// Serialized session cookie value for the given role, issued `age_ms` ago.
pub fn session_cookie_value(role: &str, age_ms: i64) -> String {
    let id = match role {
        "admin" => ADMIN_ID,
        _ => VENDOR_ID,
    };
    let timestamp = chrono::Utc::now().timestamp_millis() - age_ms;
    format!(
        r#"{{"user":{{"id":"{}","email":"{}@rental.test","type":"{}","is_verified":true}},"timestamp":{}}}"#,
        id, role, role, timestamp
    )
}

/// Builds a request with an optional fresh session cookie and optional JSON body.
pub fn request(
    method: &str,
    path: &str,
    role: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);

    if let Some(role) = role {
        builder = builder.header(
            header::COOKIE,
            format!("session_user={}", session_cookie_value(role, 0)),
        );
    }

    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Reads a response body to a JSON value.
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body read failed");
    serde_json::from_slice(&bytes).expect("body was not JSON")
}
