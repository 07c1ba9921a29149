//! # Routes
//!
//! Axum router configuration for the payment edge.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - GET  /health - Health check
/// - POST /api/payment/initiate - Payment initiation proxy
/// - POST /api/payment/webhook - Flutterwave webhook intake
///
/// Both payment routes answer non-POST methods with a 405 envelope instead
/// of axum's bare default, since the provider dashboard and the frontend
/// both surface these bodies.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - the dashboard frontend calls the initiate route
    // from the browser
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let payment_routes = Router::new()
        .route(
            "/initiate",
            post(handlers::initiate_payment).fallback(handlers::initiate_method_not_allowed),
        )
        .route(
            "/webhook",
            post(handlers::receive_webhook).fallback(handlers::webhook_method_not_allowed),
        );

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // Payment edge
        .nest("/api/payment", payment_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}
