//! API Module
//!
//! HTTP handlers and routing for the proxy REST API.
//!
//! # Endpoints
//! - `GET /api/pokemon/:name_or_id` - Fetch a Pokemon document through the cache
//! - `GET /api/pokemon/search` - Substring search over Pokemon names
//! - `GET /api/pokemon/health` - Health check endpoint
//! - `GET /api/cache/stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
