use crate::{
    AppState,
    auth::{AuthUser, Role},
    models::{
        self, AdminDashboardStats, ApplyCouponRequest, ApplyCouponResponse, Coupon,
        CreateCouponRequest, CreateOrderRequest, CreateTagRequest, EmailOutcome, ErrorResponse,
        ImageAuthParams, ORDER_STATUSES, Order, Tag, UpdateOrderStatusRequest,
        VendorDashboardStats, VendorWelcomeRequest,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

// --- Filter Structs ---

/// OrderFilter
///
/// Defines the accepted query parameters for the admin order listing endpoint
/// (GET /admin/orders). Used by Axum's Query extractor to safely bind HTTP query
/// parameters for filtering.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct OrderFilter {
    /// Optional filter for orders in a specific state.
    pub status: Option<String>,
    /// Optional filter for a single vendor's orders.
    pub vendor: Option<Uuid>,
}

// --- Uniform Error Bodies ---

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message)))
}

fn not_found(message: &str) -> ApiError {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new(message)))
}

fn conflict(message: &str) -> ApiError {
    (StatusCode::CONFLICT, Json(ErrorResponse::new(message)))
}

fn forbidden() -> ApiError {
    (StatusCode::FORBIDDEN, Json(ErrorResponse::new("insufficient role")))
}

// Generic client-facing message; the diagnostic detail rides along for operators.
fn internal(message: &str, detail: String) -> ApiError {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::with_detail(message, detail)))
}

// --- Tag Handlers ---

/// list_tags
///
/// [Any Identity] Lists all product tags, alphabetically.
#[utoipa::path(
    get,
    path = "/tags",
    responses((status = 200, description = "Tags", body = [Tag]))
)]
pub async fn list_tags(State(state): State<AppState>) -> Json<Vec<models::Tag>> {
    let tags = state.repo.list_tags().await;
    Json(tags)
}

/// create_tag
///
/// [Admin Route] Creates a new product tag.
///
/// *Idempotency*: tag names are unique; re-posting an existing name yields a
/// 409 Conflict rather than a duplicate row.
#[utoipa::path(
    post,
    path = "/admin/tags",
    request_body = CreateTagRequest,
    responses(
        (status = 200, description = "Created", body = Tag),
        (status = 409, description = "Name Taken")
    )
)]
pub async fn create_tag(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateTagRequest>,
) -> Result<Json<models::Tag>, ApiError> {
    if role != Role::Admin {
        return Err(forbidden());
    }

    let name = payload.name.trim();
    if name.is_empty() {
        return Err(bad_request("tag name is required"));
    }

    match state.repo.create_tag(name).await {
        Some(tag) => Ok(Json(tag)),
        None => Err(conflict("tag name already exists")),
    }
}

/// delete_tag
///
/// [Admin Route] Deletes a tag by id.
#[utoipa::path(
    delete,
    path = "/admin/tags/{id}",
    params(("id" = Uuid, Path, description = "Tag ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_tag(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    if role != Role::Admin {
        return StatusCode::FORBIDDEN;
    }

    if state.repo.delete_tag(id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

// --- Coupon Handlers ---

/// create_coupon
///
/// [Admin Route] Creates a discount coupon.
///
/// *Validation*: the code must be non-empty and the discount a whole percent
/// between 1 and 100; anything else is rejected before touching the database.
#[utoipa::path(
    post,
    path = "/admin/coupons",
    request_body = CreateCouponRequest,
    responses(
        (status = 200, description = "Created", body = Coupon),
        (status = 400, description = "Invalid Input"),
        (status = 409, description = "Code Taken")
    )
)]
pub async fn create_coupon(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateCouponRequest>,
) -> Result<Json<models::Coupon>, ApiError> {
    if role != Role::Admin {
        return Err(forbidden());
    }

    if payload.code.trim().is_empty() {
        return Err(bad_request("coupon code is required"));
    }
    if !(1..=100).contains(&payload.discount_percent) {
        return Err(bad_request("discount_percent must be between 1 and 100"));
    }

    let req = CreateCouponRequest { code: payload.code.trim().to_string(), ..payload };

    match state.repo.create_coupon(req).await {
        Some(coupon) => Ok(Json(coupon)),
        None => Err(conflict("coupon code already exists")),
    }
}

/// list_coupons
///
/// [Admin Route] Lists every coupon, newest first, including inactive ones.
#[utoipa::path(
    get,
    path = "/admin/coupons",
    responses((status = 200, description = "Coupons", body = [Coupon]))
)]
pub async fn list_coupons(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<models::Coupon>>, ApiError> {
    if role != Role::Admin {
        return Err(forbidden());
    }
    Ok(Json(state.repo.list_coupons().await))
}

/// delete_coupon
///
/// [Admin Route] Deletes a coupon by id.
#[utoipa::path(
    delete,
    path = "/admin/coupons/{id}",
    params(("id" = Uuid, Path, description = "Coupon ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_coupon(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    if role != Role::Admin {
        return StatusCode::FORBIDDEN;
    }

    if state.repo.delete_coupon(id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// apply_coupon
///
/// [Any Identity] Applies a coupon code to an order total and returns the
/// discounted amount. Inactive and expired coupons are rejected with a 400;
/// unknown codes with a 404.
///
/// *Side effect*: a usage-tracking row is inserted after a successful
/// application. The insert is non-critical; a failure is logged and the
/// response is returned regardless.
#[utoipa::path(
    post,
    path = "/coupons/apply",
    request_body = ApplyCouponRequest,
    responses(
        (status = 200, description = "Applied", body = ApplyCouponResponse),
        (status = 400, description = "Not Applicable"),
        (status = 404, description = "Unknown Code")
    )
)]
pub async fn apply_coupon(
    State(state): State<AppState>,
    Json(payload): Json<ApplyCouponRequest>,
) -> Result<Json<models::ApplyCouponResponse>, ApiError> {
    if payload.code.trim().is_empty() {
        return Err(bad_request("coupon code is required"));
    }
    if payload.order_total_cents < 0 {
        return Err(bad_request("order_total_cents must not be negative"));
    }

    let coupon = state
        .repo
        .get_coupon_by_code(payload.code.trim())
        .await
        .ok_or_else(|| not_found("coupon not found"))?;

    if !coupon.is_active {
        return Err(bad_request("coupon is no longer active"));
    }
    if let Some(expires_at) = coupon.expires_at {
        if expires_at < chrono::Utc::now() {
            return Err(bad_request("coupon has expired"));
        }
    }

    let discount_cents = payload.order_total_cents * i64::from(coupon.discount_percent) / 100;

    // Non-critical usage tracking. A failed insert must never abort the apply.
    if !state.repo.record_coupon_usage(coupon.id, None).await {
        tracing::warn!("usage tracking insert failed for coupon {}", coupon.code);
    }

    Ok(Json(ApplyCouponResponse {
        code: coupon.code,
        discount_percent: coupon.discount_percent,
        discount_cents,
        total_cents: payload.order_total_cents - discount_cents,
    }))
}

// --- Order Handlers ---

/// create_order
///
/// [Any Identity] Places a rental order. The customer is not a platform
/// identity; checkout data is captured inline and validated here.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Created", body = Order),
        (status = 400, description = "Invalid Input")
    )
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Json<models::Order>, ApiError> {
    if payload.customer_name.trim().is_empty() {
        return Err(bad_request("customer_name is required"));
    }
    if !payload.customer_email.contains('@') {
        return Err(bad_request("customer_email is not a valid address"));
    }
    if payload.product_name.trim().is_empty() {
        return Err(bad_request("product_name is required"));
    }
    if payload.quantity < 1 {
        return Err(bad_request("quantity must be at least 1"));
    }
    if payload.rental_end < payload.rental_start {
        return Err(bad_request("rental_end must not precede rental_start"));
    }
    if payload.total_cents < 0 {
        return Err(bad_request("total_cents must not be negative"));
    }

    match state.repo.create_order(payload).await {
        Some(order) => Ok(Json(order)),
        None => Err(internal("failed to create order", "order insert failed".to_string())),
    }
}

/// get_order
///
/// [Any Identity] Retrieves a single order by id.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Found", body = Order),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::Order>, ApiError> {
    match state.repo.get_order(id).await {
        Some(order) => Ok(Json(order)),
        None => Err(not_found("order not found")),
    }
}

/// admin_orders
///
/// [Admin Route] Lists ALL orders in the system, with optional status and
/// vendor filters.
#[utoipa::path(
    get,
    path = "/admin/orders",
    params(OrderFilter),
    responses((status = 200, description = "All orders", body = [Order]))
)]
pub async fn admin_orders(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<OrderFilter>,
) -> Result<Json<Vec<models::Order>>, ApiError> {
    if role != Role::Admin {
        return Err(forbidden());
    }
    Ok(Json(state.repo.list_orders(filter.status, filter.vendor).await))
}

/// vendor_orders
///
/// [Vendor Route] Lists the authenticated vendor's own orders.
///
/// *Note*: the vendor identity (`id`) is resolved securely via the `AuthUser`
/// extractor; a vendor can never list another vendor's orders.
#[utoipa::path(
    get,
    path = "/vendor/orders",
    responses((status = 200, description = "My Orders", body = [Order]))
)]
pub async fn vendor_orders(
    AuthUser { id, role, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<models::Order>>, ApiError> {
    if role != Role::Vendor {
        return Err(forbidden());
    }
    Ok(Json(state.repo.list_vendor_orders(id).await))
}

/// update_order_status
///
/// [Vendor Route] Moves one of the vendor's own orders to a new state.
///
/// *Authorization*: the repository query matches on `vendor_id`, so a vendor
/// targeting another vendor's order sees a plain 404.
#[utoipa::path(
    put,
    path = "/vendor/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Updated", body = Order),
        (status = 400, description = "Invalid Status"),
        (status = 404, description = "Not Found or Not Yours")
    )
)]
pub async fn update_order_status(
    AuthUser { id: vendor_id, role, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> Result<Json<models::Order>, ApiError> {
    if role != Role::Vendor {
        return Err(forbidden());
    }
    if !ORDER_STATUSES.contains(&payload.status.as_str()) {
        return Err(bad_request("status must be one of pending, confirmed, returned, cancelled"));
    }

    match state.repo.set_order_status(id, vendor_id, &payload.status).await {
        Some(order) => Ok(Json(order)),
        None => Err(not_found("order not found")),
    }
}

/// update_order_status_admin
///
/// [Admin Route] Moves ANY order to a new state, without an ownership check.
#[utoipa::path(
    put,
    path = "/admin/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Updated", body = Order),
        (status = 400, description = "Invalid Status"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_order_status_admin(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> Result<Json<models::Order>, ApiError> {
    if role != Role::Admin {
        return Err(forbidden());
    }
    if !ORDER_STATUSES.contains(&payload.status.as_str()) {
        return Err(bad_request("status must be one of pending, confirmed, returned, cancelled"));
    }

    match state.repo.set_order_status_admin(id, &payload.status).await {
        Some(order) => Ok(Json(order)),
        None => Err(not_found("order not found")),
    }
}

// --- Dashboard Handlers ---

/// admin_dashboard
///
/// [Admin Route] The admin landing page: platform-wide counters. This is also
/// the redirect target the gate sends admin identities to.
#[utoipa::path(
    get,
    path = "/admin/dashboard",
    responses((status = 200, description = "Stats", body = AdminDashboardStats))
)]
pub async fn admin_dashboard(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<AdminDashboardStats>, ApiError> {
    if role != Role::Admin {
        return Err(forbidden());
    }
    Ok(Json(state.repo.admin_stats().await))
}

/// vendor_dashboard
///
/// [Vendor Route] The vendor landing page: counters over the vendor's own
/// orders. This is also the redirect target the gate sends vendor identities to.
#[utoipa::path(
    get,
    path = "/vendor/dashboard",
    responses((status = 200, description = "Stats", body = VendorDashboardStats))
)]
pub async fn vendor_dashboard(
    AuthUser { id, role, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<VendorDashboardStats>, ApiError> {
    if role != Role::Vendor {
        return Err(forbidden());
    }
    Ok(Json(state.repo.vendor_stats(id).await))
}

// --- Onboarding Email Handler ---

/// send_vendor_welcome
///
/// [Admin Route] Sends the onboarding email to a newly approved vendor via the
/// external email provider. The request carries the template parameters; the
/// template itself lives with the provider.
///
/// The response mirrors the provider contract: `{success: true, data}` on
/// acceptance, or a 500 error body with diagnostic detail when the provider
/// rejects or cannot be reached.
#[utoipa::path(
    post,
    path = "/admin/vendors/welcome",
    request_body = VendorWelcomeRequest,
    responses(
        (status = 200, description = "Sent", body = EmailOutcome),
        (status = 400, description = "Invalid Input"),
        (status = 500, description = "Provider Failure")
    )
)]
pub async fn send_vendor_welcome(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<VendorWelcomeRequest>,
) -> Result<Json<models::EmailOutcome>, ApiError> {
    if role != Role::Admin {
        return Err(forbidden());
    }

    if payload.vendor_name.trim().is_empty() {
        return Err(bad_request("vendor_name is required"));
    }
    if !payload.vendor_email.contains('@') {
        return Err(bad_request("vendor_email is not a valid address"));
    }

    match state.mailer.send_vendor_onboarding(&payload).await {
        Ok(message_id) => Ok(Json(EmailOutcome {
            success: true,
            data: Some(message_id),
            error: None,
        })),
        Err(e) => {
            tracing::error!("vendor onboarding email failed: {}", e);
            Err(internal("email delivery failed", e))
        }
    }
}

// --- Image Host Handlers ---

/// image_auth
///
/// [Vendor Route] Generates short-lived upload authentication parameters for
/// the image host. The browser uploads product photos directly to the host
/// using these values, keeping image bytes off the application server.
#[utoipa::path(
    get,
    path = "/vendor/images/auth",
    responses((status = 200, description = "Auth Params", body = ImageAuthParams))
)]
pub async fn image_auth(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<models::ImageAuthParams>, ApiError> {
    if role != Role::Vendor {
        return Err(forbidden());
    }
    Ok(Json(state.images.auth_params()))
}

/// delete_image
///
/// [Vendor Route] Deletes a hosted image by its host-assigned file id.
#[utoipa::path(
    delete,
    path = "/vendor/images/{file_id}",
    params(("file_id" = String, Path, description = "Image host file ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Unknown File"),
        (status = 500, description = "Host Failure")
    )
)]
pub async fn delete_image(
    AuthUser { role, .. }: AuthUser,
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> impl IntoResponse {
    if role != Role::Vendor {
        return StatusCode::FORBIDDEN.into_response();
    }

    match state.images.delete_file(&file_id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => {
            (StatusCode::NOT_FOUND, Json(ErrorResponse::new("image not found"))).into_response()
        }
        Err(e) => {
            tracing::error!("image deletion failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_detail("image deletion failed", e)),
            )
                .into_response()
        }
    }
}
