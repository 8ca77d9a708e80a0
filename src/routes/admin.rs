use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, post, put},
};

/// Admin Router Module
///
/// Defines the routes nested under `/admin`, exclusively for identities with
/// the admin role. These endpoints provide moderation, catalog management, and
/// statistical oversight. The gate redirects vendor identities away from the
/// whole prefix; each handler repeats the role check as the second layer.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin/dashboard
        // The admin landing page and the gate's redirect target for admin
        // identities. Returns platform-wide counters.
        .route("/dashboard", get(handlers::admin_dashboard))
        // GET /admin/orders?status=...&vendor=...
        // Lists ALL orders in the system with optional status/vendor filters.
        .route("/orders", get(handlers::admin_orders))
        // PUT /admin/orders/{id}/status
        // Moves ANY order through its lifecycle, without an ownership check.
        .route("/orders/{id}/status", put(handlers::update_order_status_admin))
        // POST/GET /admin/coupons
        // Coupon management: creation (validated, unique code) and full listing.
        .route("/coupons", post(handlers::create_coupon).get(handlers::list_coupons))
        // DELETE /admin/coupons/{id}
        // Removes a coupon entirely. Usage history rows are kept.
        .route("/coupons/{id}", delete(handlers::delete_coupon))
        // POST /admin/tags
        // Creates a product tag; duplicate names answer 409.
        .route("/tags", post(handlers::create_tag))
        // DELETE /admin/tags/{id}
        .route("/tags/{id}", delete(handlers::delete_tag))
        // POST /admin/vendors/welcome
        // Sends the onboarding email to a newly approved vendor through the
        // external email provider.
        .route("/vendors/welcome", post(handlers::send_vendor_welcome))
}
