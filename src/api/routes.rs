//! API Routes
//!
//! Configures the Axum router with all proxy endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    get_pokemon_handler, health_handler, search_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/pokemon/:name_or_id` - Pokemon document, cached
/// - `GET /api/pokemon/search` - Name search
/// - `GET /api/pokemon/health` - Health check
/// - `GET /api/cache/stats` - Cache statistics
/// - `GET /health` - Health check
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Static segments win over the capture, so search and health are never
    // treated as Pokemon names
    Router::new()
        .route("/api/pokemon/search", get(search_handler))
        .route("/api/pokemon/health", get(health_handler))
        .route("/api/pokemon/:name_or_id", get(get_pokemon_handler))
        .route("/api/cache/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
