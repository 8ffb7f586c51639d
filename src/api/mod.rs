//! HTTP surface.
pub mod admin;
pub mod catalog;
pub mod error;
pub mod orders;
pub mod payments;
pub mod state;

use axum::{middleware, routing::{get, post, put}, Json, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use state::{AppState, Ports};

pub fn router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/orders", get(admin::list_orders))
        .route("/orders/stats", get(admin::stats))
        .route("/orders/:order_id", get(admin::get_order))
        .route("/orders/:order_id/order-status", put(admin::set_order_status))
        .route("/orders/:order_id/payment-status", put(admin::set_payment_status))
        .route_layer(middleware::from_fn_with_state(state.clone(), admin::require_admin));

    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "xcosmetic-storefront"})) }))
        .route("/api/v1/products", get(catalog::list_products))
        .route("/api/v1/products/best-deals", get(catalog::best_deals))
        .route("/api/v1/products/:slug", get(catalog::get_product))
        .route("/api/v1/products/:slug/reviews", get(catalog::list_reviews))
        .route("/api/v1/reviews", post(catalog::create_review))
        .route("/api/v1/orders", post(orders::create_order))
        .route("/api/v1/orders/:order_id", get(orders::get_order))
        .route("/api/v1/payment/callback", get(payments::callback))
        .nest("/api/v1/admin", admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
