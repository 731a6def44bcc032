//! Pokemon Service
//!
//! Read-through lookup on top of the LRU cache, and substring search over the
//! memoized name list.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};

use crate::cache::{CacheStats, LruCache};
use crate::error::{ProxyError, Result};
use crate::upstream::{NameLister, UpstreamClient};

/// Number of search results returned when the caller gives no limit.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

// == Pokemon Service ==
/// Serves Pokemon documents from the cache, falling back to upstream.
///
/// Concurrent misses for the same key are not coalesced: each one calls
/// upstream and writes the cache, and the last write wins.
pub struct PokemonService {
    upstream: Arc<dyn UpstreamClient>,
    names_source: Arc<dyn NameLister>,
    cache: Arc<LruCache<String, String>>,
    /// Name list, filled by the first search that needs it
    names: OnceCell<Arc<Vec<String>>>,
}

impl PokemonService {
    /// Creates a service with an empty cache of `max_entries` entries.
    pub fn new(
        upstream: Arc<dyn UpstreamClient>,
        names_source: Arc<dyn NameLister>,
        max_entries: usize,
        ttl: Duration,
    ) -> Self {
        Self {
            upstream,
            names_source,
            cache: Arc::new(LruCache::new(max_entries, ttl)),
            names: OnceCell::new(),
        }
    }

    /// Creates a service whose lookups and name list come from one client.
    pub fn with_client<C>(client: Arc<C>, max_entries: usize, ttl: Duration) -> Self
    where
        C: UpstreamClient + NameLister + 'static,
    {
        Self::new(client.clone(), client, max_entries, ttl)
    }

    /// Normalizes an identifier into its cache key.
    pub fn cache_key(identifier: &str) -> String {
        identifier.to_lowercase()
    }

    /// Blank keys and dot segments would address the listing endpoint
    /// instead of a single document.
    fn is_valid_key(key: &str) -> bool {
        !key.trim().is_empty() && key != "." && key != ".."
    }

    // == Fetch ==
    /// Returns the raw document for `identifier`.
    ///
    /// Hits never contact upstream. A miss makes exactly one upstream call;
    /// found documents are cached under the lower-cased identifier, while
    /// not-found answers and upstream errors leave the cache untouched.
    #[instrument(skip(self))]
    pub async fn fetch(&self, identifier: &str) -> Result<String> {
        let key = Self::cache_key(identifier);
        if !Self::is_valid_key(&key) {
            return Err(ProxyError::InvalidRequest(format!(
                "Invalid Pokemon identifier: {:?}",
                identifier
            )));
        }

        if let Some(cached) = self.cache.get(&key) {
            debug!(%key, "Cache hit");
            return Ok(cached);
        }

        debug!(%key, "Cache miss, fetching from upstream");
        match self.upstream.fetch_raw(&key).await? {
            Some(raw) => {
                self.cache.put(key, raw.clone());
                Ok(raw)
            }
            None => Err(ProxyError::NotFound(key)),
        }
    }

    // == Search ==
    /// Returns up to `limit` names containing `keyword`, ignoring case.
    ///
    /// Results keep the name list order. A blank keyword returns nothing and
    /// does not load the name list.
    pub async fn search(&self, keyword: &str, limit: usize) -> Vec<String> {
        let needle = keyword.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let names = self.names().await;
        names
            .iter()
            .filter(|name| name.to_lowercase().contains(&needle))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Returns the memoized name list, loading it on first use.
    ///
    /// Concurrent callers wait on the same load. An empty listing is returned
    /// but not memoized, so the next search tries again.
    async fn names(&self) -> Arc<Vec<String>> {
        let loaded = self
            .names
            .get_or_try_init(|| async {
                let names = self.names_source.list_all_names().await;
                if names.is_empty() {
                    Err(())
                } else {
                    info!(count = names.len(), "Name list loaded");
                    Ok(Arc::new(names))
                }
            })
            .await;

        match loaded {
            Ok(names) => Arc::clone(names),
            Err(()) => Arc::new(Vec::new()),
        }
    }

    // == Accessors ==
    /// Shared handle to the cache, used by the sweep task.
    pub fn cache(&self) -> Arc<LruCache<String, String>> {
        Arc::clone(&self.cache)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UpstreamError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_test::{assert_err, assert_ok};

    /// In-memory upstream counting every call.
    #[derive(Default)]
    struct MockUpstream {
        docs: HashMap<String, String>,
        names: Vec<String>,
        fail: bool,
        fetch_calls: AtomicUsize,
        list_calls: AtomicUsize,
    }

    impl MockUpstream {
        fn with_pokemon(mut self, name: &str) -> Self {
            self.docs
                .insert(name.to_string(), format!(r#"{{"name":"{}"}}"#, name));
            self
        }

        fn with_names(mut self, names: &[&str]) -> Self {
            self.names = names.iter().map(|n| n.to_string()).collect();
            self
        }

        fn failing(mut self) -> Self {
            self.fail = true;
            self
        }

        fn fetch_calls(&self) -> usize {
            self.fetch_calls.load(Ordering::SeqCst)
        }

        fn list_calls(&self) -> usize {
            self.list_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl UpstreamClient for MockUpstream {
        async fn fetch_raw(&self, key: &str) -> std::result::Result<Option<String>, UpstreamError> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(UpstreamError::Timeout);
            }
            Ok(self.docs.get(key).cloned())
        }
    }

    #[async_trait]
    impl NameLister for MockUpstream {
        async fn list_all_names(&self) -> Vec<String> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.names.clone()
        }
    }

    fn service(mock: MockUpstream) -> (Arc<MockUpstream>, PokemonService) {
        let mock = Arc::new(mock);
        let service = PokemonService::with_client(mock.clone(), 100, Duration::from_secs(300));
        (mock, service)
    }

    #[tokio::test]
    async fn test_read_through_fill() {
        let (mock, service) = service(MockUpstream::default().with_pokemon("pikachu"));

        let first = assert_ok!(service.fetch("pikachu").await);
        assert_eq!(mock.fetch_calls(), 1);

        let second = assert_ok!(service.fetch("pikachu").await);
        assert_eq!(mock.fetch_calls(), 1);
        assert_eq!(first, second);
        assert_eq!(service.cache_stats().hits, 1);
    }

    #[tokio::test]
    async fn test_not_found_is_not_cached() {
        let (mock, service) = service(MockUpstream::default());

        let err = assert_err!(service.fetch("doesnotexist").await);
        assert!(matches!(err, ProxyError::NotFound(ref key) if key == "doesnotexist"));
        assert_err!(service.fetch("doesnotexist").await);

        assert_eq!(mock.fetch_calls(), 2);
        assert!(service.cache().is_empty());
    }

    #[tokio::test]
    async fn test_case_normalization_shares_slot() {
        let (mock, service) = service(MockUpstream::default().with_pokemon("pikachu"));

        assert_ok!(service.fetch("Pikachu").await);
        assert_ok!(service.fetch("pikachu").await);
        assert_ok!(service.fetch("PIKACHU").await);

        assert_eq!(mock.fetch_calls(), 1);
        assert_eq!(service.cache().size(), 1);
    }

    #[tokio::test]
    async fn test_blank_and_dot_identifiers_are_rejected() {
        let (mock, service) = service(MockUpstream::default().with_pokemon("pikachu"));

        for identifier in ["", "   ", ".", ".."] {
            let err = assert_err!(service.fetch(identifier).await);
            assert!(matches!(err, ProxyError::InvalidRequest(_)), "{:?}", identifier);
        }

        assert_eq!(mock.fetch_calls(), 0);
        assert!(service.cache().is_empty());
        assert_eq!(service.cache_stats().misses, 0);
    }

    #[tokio::test]
    async fn test_upstream_error_propagates_and_is_not_cached() {
        let (mock, service) = service(MockUpstream::default().with_pokemon("pikachu").failing());

        let err = assert_err!(service.fetch("pikachu").await);
        assert!(matches!(err, ProxyError::Upstream(UpstreamError::Timeout)));
        assert_err!(service.fetch("pikachu").await);

        assert_eq!(mock.fetch_calls(), 2);
        assert!(service.cache().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_after_ttl_goes_upstream_again() {
        let mock = Arc::new(MockUpstream::default().with_pokemon("eevee"));
        let service = PokemonService::with_client(mock.clone(), 10, Duration::from_millis(50));

        assert_ok!(service.fetch("eevee").await);
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_ok!(service.fetch("eevee").await);

        assert_eq!(mock.fetch_calls(), 2);
    }

    #[tokio::test]
    async fn test_search_blank_keyword_skips_name_list() {
        let (mock, service) = service(MockUpstream::default().with_names(&["charmander"]));

        assert!(service.search("", DEFAULT_SEARCH_LIMIT).await.is_empty());
        assert!(service.search("   ", DEFAULT_SEARCH_LIMIT).await.is_empty());
        assert_eq!(mock.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_search_is_capped_and_ordered() {
        let names: Vec<String> = (0..25).map(|i| format!("char{:02}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let (_, service) = service(MockUpstream::default().with_names(&refs));

        let results = service.search("char", DEFAULT_SEARCH_LIMIT).await;
        assert_eq!(results.len(), 10);
        assert_eq!(results[0], "char00");
        assert_eq!(results[9], "char09");

        assert_eq!(service.search("char", 3).await.len(), 3);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let (_, service) = service(
            MockUpstream::default().with_names(&["charmander", "pikachu", "charizard", "raichu"]),
        );

        assert_eq!(service.search("  CHAR ", 10).await, vec!["charmander", "charizard"]);
        assert_eq!(service.search("chu", 10).await, vec!["pikachu", "raichu"]);
        assert!(service.search("mewtwo", 10).await.is_empty());
    }

    #[tokio::test]
    async fn test_name_list_loaded_once_under_concurrency() {
        let (mock, service) = service(MockUpstream::default().with_names(&["bulbasaur", "ivysaur"]));
        let service = Arc::new(service);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.search("saur", 10).await })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap().len(), 2);
        }
        assert_eq!(mock.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_name_list_is_retried() {
        let (mock, service) = service(MockUpstream::default());

        assert!(service.search("pika", 10).await.is_empty());
        assert!(service.search("pika", 10).await.is_empty());
        assert_eq!(mock.list_calls(), 2);
    }
}
