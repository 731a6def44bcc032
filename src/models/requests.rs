//! Request DTOs for the proxy API
//!
//! Defines the structure of incoming query strings.

use serde::Deserialize;

use crate::service::DEFAULT_SEARCH_LIMIT;

/// Query string for the search operation (GET /api/pokemon/search)
///
/// # Fields
/// - `keyword`: Substring to look for, case-insensitive
/// - `limit`: Maximum number of names returned (defaults to 10)
#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    pub keyword: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl SearchParams {
    /// Returns the requested limit or the default one.
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_SEARCH_LIMIT)
    }
}
