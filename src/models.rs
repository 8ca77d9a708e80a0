use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

/// The closed vocabulary of order states. Stored as text; handlers reject any
/// other value with a 400 before it reaches the database.
pub const ORDER_STATUSES: [&str; 4] = ["pending", "confirmed", "returned", "cancelled"];

// --- Core Application Schemas (Mapped to Database) ---

/// Coupon
///
/// A discount code record from the `coupons` table. Codes are unique platform-wide
/// and apply a percentage discount to an order total.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Coupon {
    pub id: Uuid,
    pub code: String,
    /// Whole-percent discount, 1 to 100.
    pub discount_percent: i32,
    /// Soft kill-switch: an inactive coupon cannot be applied but stays listed.
    pub is_active: bool,
    /// Optional hard expiry. A coupon with no expiry stays valid while active.
    #[ts(type = "string | null")]
    pub expires_at: Option<DateTime<Utc>>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Order
///
/// A rental order record from the `orders` table. Customers are not platform
/// identities (checkout data is captured inline); the vendor is referenced by id.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Order {
    pub id: Uuid,
    // The vendor fulfilling this rental.
    pub vendor_id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub product_name: String,
    pub quantity: i32,
    /// First and last day of the rental period, inclusive.
    #[ts(type = "string")]
    pub rental_start: NaiveDate,
    #[ts(type = "string")]
    pub rental_end: NaiveDate,
    /// Order total after any coupon discount, in cents.
    pub total_cents: i64,
    /// The coupon code applied at checkout, if any. Denormalized for display.
    pub coupon_code: Option<String>,
    /// One of `pending`, `confirmed`, `returned`, `cancelled`.
    pub status: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Tag
///
/// A product tag from the `tags` table. Names are unique.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

// --- Request Payloads (Input Schemas) ---

/// CreateCouponRequest
///
/// Input payload for creating a coupon (POST /admin/coupons).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateCouponRequest {
    pub code: String,
    pub discount_percent: i32,
    #[ts(type = "string | null")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// ApplyCouponRequest
///
/// Input payload for applying a coupon code to an order total (POST /coupons/apply).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ApplyCouponRequest {
    pub code: String,
    /// The pre-discount order total, in cents.
    pub order_total_cents: i64,
}

/// ApplyCouponResponse
///
/// Output schema for a successful coupon application: the discount actually
/// granted and the resulting total.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ApplyCouponResponse {
    pub code: String,
    pub discount_percent: i32,
    pub discount_cents: i64,
    pub total_cents: i64,
}

/// CreateOrderRequest
///
/// Input payload for placing a rental order (POST /orders).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateOrderRequest {
    pub vendor_id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub product_name: String,
    pub quantity: i32,
    #[ts(type = "string")]
    pub rental_start: NaiveDate,
    #[ts(type = "string")]
    pub rental_end: NaiveDate,
    pub total_cents: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
}

/// UpdateOrderStatusRequest
///
/// Input payload for moving an order through its lifecycle
/// (PUT /vendor/orders/{id}/status, PUT /admin/orders/{id}/status).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

/// CreateTagRequest
///
/// Input payload for creating a tag (POST /admin/tags).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateTagRequest {
    pub name: String,
}

/// VendorWelcomeRequest
///
/// Input payload for the vendor onboarding email (POST /admin/vendors/welcome).
/// These fields become the template parameters handed to the email provider;
/// the template itself lives with the provider and is out of scope here.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct VendorWelcomeRequest {
    pub vendor_name: String,
    pub vendor_email: String,
    pub store_name: String,
}

// --- Service Response Schemas (Output) ---

/// EmailOutcome
///
/// Output schema for email-sending endpoints, mirroring the provider's own
/// `{success, data | error}` response shape.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct EmailOutcome {
    pub success: bool,
    /// Provider message id on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// ImageAuthParams
///
/// Output schema for image-host upload authentication (GET /vendor/images/auth).
/// The browser presents these three values to the image host alongside the
/// public key to authorize a direct upload.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ImageAuthParams {
    /// Single-use random token.
    pub token: String,
    /// Epoch seconds after which the parameters are no longer accepted.
    pub expire: i64,
    /// Hex-encoded signature over token and expiry, keyed by the private key.
    pub signature: String,
}

/// AdminDashboardStats
///
/// Output schema for the administrative dashboard (GET /admin/dashboard).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AdminDashboardStats {
    pub total_orders: i64,
    /// Orders still in the `pending` state.
    pub pending_orders: i64,
    pub total_coupons: i64,
    pub total_tags: i64,
}

/// VendorDashboardStats
///
/// Output schema for a vendor's dashboard (GET /vendor/dashboard), scoped to the
/// authenticated vendor's own orders.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct VendorDashboardStats {
    pub vendor_id: Uuid,
    pub total_orders: i64,
    pub pending_orders: i64,
    pub returned_orders: i64,
}

/// ErrorResponse
///
/// The uniform error body for every failing handler: a generic, client-safe
/// message plus an optional diagnostic detail.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self { message: message.to_string(), detail: None }
    }

    pub fn with_detail(message: &str, detail: String) -> Self {
        Self { message: message.to_string(), detail: Some(detail) }
    }
}
