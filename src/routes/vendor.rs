use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, put},
};

/// Vendor Router Module
///
/// Defines the routes nested under `/vendor`, exclusively for identities with
/// the vendor role. The gate already bounces admin identities to their own
/// dashboard before a handler runs; every handler here still checks the role
/// itself, so the scope holds even if a route is ever mounted elsewhere.
pub fn vendor_routes() -> Router<AppState> {
    Router::new()
        // GET /vendor/dashboard
        // The vendor landing page and the gate's redirect target for vendor
        // identities. Returns counters over the vendor's own orders.
        .route("/dashboard", get(handlers::vendor_dashboard))
        // GET /vendor/orders
        // Lists the authenticated vendor's own orders. The vendor id comes from
        // the session, never from the request, so cross-vendor reads are
        // impossible by construction.
        .route("/orders", get(handlers::vendor_orders))
        // PUT /vendor/orders/{id}/status
        // Moves one of the vendor's own orders through its lifecycle. The
        // ownership check lives in the repository query (vendor_id match).
        .route("/orders/{id}/status", put(handlers::update_order_status))
        // GET /vendor/images/auth
        // Generates short-lived upload auth parameters for the image host,
        // enabling direct browser-to-host uploads of product photos.
        .route("/images/auth", get(handlers::image_auth))
        // DELETE /vendor/images/{file_id}
        // Deletes a hosted image by its host-assigned identifier.
        .route("/images/{file_id}", delete(handlers::delete_image))
}
