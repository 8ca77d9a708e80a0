use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines the endpoints that live outside the role-scoped areas. Note that
/// "outside a role scope" is not "anonymous": the access gate still requires a
/// fresh identity for every path here except the login path. What these routes
/// have in common is that both roles (and, for checkout, any identity) may call
/// them.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // A simple endpoint used for monitoring checks from inside the session
        // perimeter. Returns "ok" immediately to verify the service is responsive.
        .route("/health", get(|| async { "ok" }))
        // GET /login
        // The anonymous landing path and the gate's redirect target for every
        // unauthenticated request. The login UI itself is client-side; the
        // server only needs the path to exist and answer.
        .route("/login", get(|| async { "login" }))
        // GET /tags
        // Lists all product tags. Read-only and role-agnostic.
        .route("/tags", get(handlers::list_tags))
        // POST /coupons/apply
        // Applies a coupon code to an order total and returns the discounted
        // amount. Records coupon usage as a non-critical side effect.
        .route("/coupons/apply", post(handlers::apply_coupon))
        // POST /orders
        // Places a rental order. Checkout data is validated in the handler.
        .route("/orders", post(handlers::create_order))
        // GET /orders/{id}
        // Retrieves a single order, e.g. for a confirmation view.
        .route("/orders/{id}", get(handlers::get_order))
}
