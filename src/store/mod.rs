pub mod disk;
pub mod memory;

use crate::core::cache::KeyValueStore;
use crate::core::config::AppConfig;
use crate::core::error::StoreError;
use disk::DiskStore;
use memory::MemoryStore;
use std::sync::Arc;
use tracing::warn;

/// Opens the on-disk store under `<data_path>/store`.
pub fn open_persistent(config: &AppConfig) -> Result<Arc<dyn KeyValueStore>, StoreError> {
    let path = config
        .default_data_path()
        .map_err(|e| StoreError::Backend(e.to_string()))?
        .join("store");
    Ok(Arc::new(DiskStore::open(&path)?))
}

/// Store for the response cache. Falls back to memory when the disk store cannot be
/// opened: the cache is best-effort and must never stop a fetch.
pub fn open_cache(config: &AppConfig) -> Arc<dyn KeyValueStore> {
    open_shared(config).0
}

/// Opens the disk store once for both the cache and the watchlists. When it cannot be
/// opened the cache runs in memory while the watchlist side carries the error.
pub fn open_shared(
    config: &AppConfig,
) -> (
    Arc<dyn KeyValueStore>,
    Result<Arc<dyn KeyValueStore>, StoreError>,
) {
    match open_persistent(config) {
        Ok(store) => (store.clone(), Ok(store)),
        Err(e) => {
            warn!("Falling back to in-memory cache: {}", e);
            (Arc::new(MemoryStore::new()), Err(e))
        }
    }
}
