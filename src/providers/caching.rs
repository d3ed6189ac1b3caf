use crate::core::cache::{CacheEntry, KeyValueStore};
use crate::core::error::FetchError;
use crate::core::market::MarketDataProvider;
use crate::core::request::MarketRequest;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Serves market data from a key-value store while it is fresh and falls back to the
/// wrapped provider otherwise. Cache reads and writes are best-effort: a broken or
/// unavailable store behaves like an empty one.
pub struct CachingProvider<T: MarketDataProvider> {
    inner: T,
    store: Arc<dyn KeyValueStore>,
}

impl<T: MarketDataProvider> CachingProvider<T> {
    pub fn new(inner: T, store: Arc<dyn KeyValueStore>) -> Self {
        Self { inner, store }
    }

    async fn read_fresh(&self, key: &str) -> Option<Value> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("Cache MISS for key: {}", key);
                return None;
            }
            Err(e) => {
                debug!("Cache read error for key {}: {}", key, e);
                return None;
            }
        };

        let entry: CacheEntry<Value> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Corrupt cache entry for key {}: {}", key, e);
                return None;
            }
        };

        if entry.data.is_null() || !entry.is_fresh() {
            debug!("Cache entry expired for key: {}", key);
            return None;
        }
        debug!("Cache HIT for key: {}", key);
        Some(entry.data)
    }

    async fn write(&self, key: &str, data: &Value) {
        let entry = CacheEntry::new(data);
        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to encode cache entry for key {}: {}", key, e);
                return;
            }
        };
        match self.store.set(key, raw).await {
            Ok(()) => debug!("Cache PUT for key: {}", key),
            Err(e) => warn!("Cache write failed for key {}: {}", key, e),
        }
    }

    /// Returns fresh cached data for `request`, or fetches and caches it.
    pub async fn fetch_with_cache(&self, request: &MarketRequest) -> Result<Value, FetchError> {
        let key = request.cache_key();
        if let Some(data) = self.read_fresh(&key).await {
            return Ok(data);
        }

        let data = self.inner.fetch(request).await?;
        self.write(&key, &data).await;
        Ok(data)
    }
}

#[async_trait]
impl<T: MarketDataProvider> MarketDataProvider for CachingProvider<T> {
    async fn fetch(&self, request: &MarketRequest) -> Result<Value, FetchError> {
        self.fetch_with_cache(request).await
    }
}
