//! PokeAPI client.
//!
//! Fetches single Pokemon documents and walks the paginated name listing.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::{NameLister, UpstreamClient};
use crate::config::Config;
use crate::error::UpstreamError;

/// HTTP client for the PokeAPI REST endpoints.
#[derive(Debug, Clone)]
pub struct PokeApiClient {
    base_url: Url,
    http_client: reqwest::Client,
    page_size: usize,
    max_names: usize,
}

impl PokeApiClient {
    /// Creates a client for `base_url` with the given request timeout.
    ///
    /// Name listing uses pages of 1000 and stops at offset 2000.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| UpstreamError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidUrl(base_url.to_string()));
        }

        let http_client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            http_client,
            page_size: 1000,
            max_names: 2000,
        })
    }

    /// Creates a client from the proxy configuration.
    pub fn from_config(config: &Config) -> Result<Self, UpstreamError> {
        Ok(Self::new(&config.upstream_base_url, config.timeout())?
            .with_name_paging(config.name_page_size, config.name_list_max))
    }

    /// Overrides the name listing page size and walk bound.
    pub fn with_name_paging(mut self, page_size: usize, max_names: usize) -> Self {
        self.page_size = page_size.max(1);
        self.max_names = max_names;
        self
    }

    /// Builds `{base}/pokemon[/{segment}]`, percent-encoding the segment.
    fn pokemon_url(&self, segment: Option<&str>) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| UpstreamError::InvalidUrl(self.base_url.to_string()))?;
            segments.pop_if_empty().push("pokemon");
            if let Some(segment) = segment {
                // `push` drops dot segments and would leave the listing URL
                if segment.is_empty() || segment == "." || segment == ".." {
                    return Err(UpstreamError::InvalidUrl(format!(
                        "unusable path segment {:?}",
                        segment
                    )));
                }
                segments.push(segment);
            }
        }
        Ok(url)
    }

    /// Appends one page of the listing to `names`, returning whether
    /// another page follows.
    async fn fetch_name_page(
        &self,
        offset: usize,
        names: &mut Vec<String>,
    ) -> Result<bool, UpstreamError> {
        let mut url = self.pokemon_url(None)?;
        url.query_pairs_mut()
            .append_pair("limit", &self.page_size.to_string())
            .append_pair("offset", &offset.to_string());

        let response = self.http_client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(UpstreamError::Status(response.status().as_u16()));
        }

        let page: Value = response.json().await?;
        let results = page
            .get("results")
            .and_then(Value::as_array)
            .ok_or_else(|| UpstreamError::Decode("missing results array".to_string()))?;

        names.extend(
            results
                .iter()
                .filter_map(|item| item.get("name").and_then(Value::as_str))
                .map(str::to_string),
        );

        Ok(page.get("next").is_some_and(|next| !next.is_null()))
    }
}

#[async_trait]
impl UpstreamClient for PokeApiClient {
    #[instrument(skip(self))]
    async fn fetch_raw(&self, key: &str) -> Result<Option<String>, UpstreamError> {
        let url = self.pokemon_url(Some(key))?;
        let response = self.http_client.get(url).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!("Upstream reported not found");
                Ok(None)
            }
            status if status.is_success() => Ok(Some(response.text().await?)),
            status => {
                warn!(status = status.as_u16(), "Unexpected upstream status");
                Err(UpstreamError::Status(status.as_u16()))
            }
        }
    }
}

#[async_trait]
impl NameLister for PokeApiClient {
    #[instrument(skip(self))]
    async fn list_all_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        let mut offset = 0;

        while offset < self.max_names {
            match self.fetch_name_page(offset, &mut names).await {
                Ok(true) => offset += self.page_size,
                Ok(false) => break,
                Err(err) => {
                    warn!(error = %err, offset, collected = names.len(), "Name listing stopped early");
                    break;
                }
            }
        }

        debug!(count = names.len(), "Name listing complete");
        names
    }
}
