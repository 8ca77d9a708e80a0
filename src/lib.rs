use axum::{Router, extract::FromRef, http::HeaderName, middleware};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod email;
pub mod gate;
pub mod handlers;
pub mod imagehost;
pub mod models;
pub mod repository;

// Module for routing segregation (Public, Vendor, Admin).
pub mod routes;
use gate::access_gate;
use routes::{admin, public, vendor};

// --- Public Re-exports ---

// Makes core state types easily accessible to the main application entry point
// (main.rs) and the test suite.
pub use config::AppConfig;
pub use email::{HttpMailer, MailerState, MockMailer};
pub use imagehost::{ImageHostState, ImageKitClient, MockImageHost};
pub use repository::{PostgresRepository, RepositoryState};

/// ApiDoc
///
/// This struct auto-generates the OpenAPI documentation (Swagger JSON) for the
/// application. It aggregates all API paths and data schemas decorated with the
/// `#[utoipa::path]` and `#[derive(utoipa::ToSchema)]` macros. The resulting
/// JSON is served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    // List all public handler functions here for documentation generation.
    paths(
        handlers::list_tags, handlers::create_tag, handlers::delete_tag,
        handlers::create_coupon, handlers::list_coupons, handlers::delete_coupon,
        handlers::apply_coupon, handlers::create_order, handlers::get_order,
        handlers::admin_orders, handlers::vendor_orders, handlers::update_order_status,
        handlers::update_order_status_admin, handlers::admin_dashboard,
        handlers::vendor_dashboard, handlers::send_vendor_welcome,
        handlers::image_auth, handlers::delete_image
    ),
    // List all models (schemas) used in the request/response bodies.
    components(
        schemas(
            models::Coupon, models::CreateCouponRequest, models::ApplyCouponRequest,
            models::ApplyCouponResponse, models::Order, models::CreateOrderRequest,
            models::UpdateOrderStatusRequest, models::Tag, models::CreateTagRequest,
            models::VendorWelcomeRequest, models::EmailOutcome, models::ImageAuthParams,
            models::AdminDashboardStats, models::VendorDashboardStats, models::ErrorResponse,
        )
    ),
    tags(
        (name = "rental-portal", description = "Rental Platform API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, thread-safe, immutable container holding all essential
/// application services and configuration, shared across all incoming requests.
#[derive(Clone)]
pub struct AppState {
    /// Repository Layer: abstracts database access via the PgPool connection.
    pub repo: RepositoryState,
    /// Image Host: upload auth parameter generation and file deletion.
    pub images: ImageHostState,
    /// Mailer: the external email provider client.
    pub mailer: MailerState,
    /// Configuration: the loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// These implementations allow handlers to selectively pull components from the
// shared AppState.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for ImageHostState {
    fn from_ref(app_state: &AppState) -> ImageHostState {
        app_state.images.clone()
    }
}

impl FromRef<AppState> for MailerState {
    fn from_ref(app_state: &AppState) -> MailerState {
        app_state.mailer.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the application's entire routing structure, applies the access
/// gate and the observability layers, and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: Serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Routes outside the role scopes.
        .merge(public::public_routes())
        // Role-scoped routes, nested under their gate-classified prefixes.
        .nest("/vendor", vendor::vendor_routes())
        .nest("/admin", admin::admin_routes())
        // Apply the Unified State to all routes.
        .with_state(state)
        // Access Gate: every request that is not a static asset passes through
        // the session decision table before any route is considered.
        .layer(middleware::from_fn(access_gate));

    // 3. Observability and Correlation Layers (Applied outermost/first)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID Generation: a unique UUID for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request Tracing: wraps the request/response lifecycle in a
                // tracing span correlated by the generated request ID. Redirects
                // produced by the gate are logged here like any other response.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID Propagation: returns the generated x-request-id
                // header to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer
        .layer(cors)
}

/// trace_span_logger
///
/// Helper function used by `TraceLayer` to customize the tracing span creation.
/// It extracts the `x-request-id` header (if present) and includes it in the
/// structured logging metadata alongside the HTTP method and URI, so every log
/// line for a single request is correlated by a unique ID.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
