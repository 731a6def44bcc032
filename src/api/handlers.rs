//! API Handlers
//!
//! HTTP request handlers for each proxy endpoint.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::config::Config;
use crate::error::{ProxyError, Result, UpstreamError};
use crate::models::{HealthResponse, SearchParams, StatsResponse};
use crate::service::PokemonService;
use crate::upstream::PokeApiClient;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PokemonService>,
}

impl AppState {
    /// Creates a new AppState around an existing service.
    pub fn new(service: PokemonService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds the PokeAPI client and a service with the configured cache bounds.
    pub fn from_config(config: &Config) -> std::result::Result<Self, UpstreamError> {
        let client = Arc::new(PokeApiClient::from_config(config)?);
        Ok(Self::new(PokemonService::with_client(
            client,
            config.max_entries,
            config.ttl(),
        )))
    }
}

/// Handler for GET /api/pokemon/:name_or_id
///
/// Returns the upstream JSON document as-is.
pub async fn get_pokemon_handler(
    State(state): State<AppState>,
    Path(name_or_id): Path<String>,
) -> Result<Response> {
    let raw = state.service.fetch(&name_or_id).await?;

    Ok(([(header::CONTENT_TYPE, "application/json")], raw).into_response())
}

/// Handler for GET /api/pokemon/search?keyword=..&limit=..
///
/// A missing or malformed query string is reported with the JSON error body.
pub async fn search_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<String>>> {
    let Query(params) =
        query.map_err(|rejection| ProxyError::InvalidRequest(rejection.body_text()))?;
    let limit = params.limit();
    Ok(Json(state.service.search(&params.keyword, limit).await))
}

/// Handler for GET /api/cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.service.cache_stats().into())
}

/// Handler for GET /health and GET /api/pokemon/health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::up())
}
