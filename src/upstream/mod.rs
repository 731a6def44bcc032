//! Upstream Module
//!
//! Contracts the proxy consumes from the upstream API, plus the reqwest-based
//! PokeAPI implementation.

mod pokeapi;

use async_trait::async_trait;

use crate::error::UpstreamError;

pub use pokeapi::PokeApiClient;

/// Fetches raw resource payloads by normalized key.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Returns the raw body for `key`, `Ok(None)` when upstream answers 404.
    ///
    /// Called exactly once per cache miss; implementations must not retry.
    async fn fetch_raw(&self, key: &str) -> Result<Option<String>, UpstreamError>;
}

/// Lists every valid resource name.
#[async_trait]
pub trait NameLister: Send + Sync {
    /// Returns all names in upstream order.
    ///
    /// Never fails: if a page cannot be fetched or decoded, the names gathered
    /// so far are returned.
    async fn list_all_names(&self) -> Vec<String>;
}
