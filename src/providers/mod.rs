pub mod alphavantage;
pub mod caching;
pub mod image;

use crate::core::cache::KeyValueStore;
use crate::core::config::AlphaVantageConfig;
use crate::core::error::FetchError;
use alphavantage::AlphaVantageProvider;
use caching::CachingProvider;
use std::sync::Arc;

/// The Alpha Vantage provider behind the response cache.
pub type CachedAlphaVantage = CachingProvider<AlphaVantageProvider>;

pub fn cached_alphavantage(
    config: &AlphaVantageConfig,
    store: Arc<dyn KeyValueStore>,
) -> Result<CachedAlphaVantage, FetchError> {
    Ok(CachingProvider::new(AlphaVantageProvider::new(config)?, store))
}
