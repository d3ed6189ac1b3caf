use crate::core::cache::KeyValueStore;
use crate::core::error::StoreError;
use async_trait::async_trait;
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION: &str = "stockwatch";

/// Key-value store persisted with fjall. Each `set` is synced before returning so that
/// watchlist edits survive a crash.
pub struct DiskStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(path).map_err(|e| StoreError::Backend(e.to_string()))?;

        let keyspace = Config::new(path).open()?;
        let partition = keyspace.open_partition(PARTITION, PartitionCreateOptions::default())?;
        debug!("Opened disk store at {}", path.display());
        Ok(Self {
            keyspace,
            partition,
        })
    }
}

#[async_trait]
impl KeyValueStore for DiskStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self.partition.get(key.as_bytes())?;
        debug!(key, found = value.is_some(), "Disk store GET");
        value
            .map(|bytes| {
                String::from_utf8(bytes.to_vec()).map_err(|_| StoreError::Encoding(key.to_string()))
            })
            .transpose()
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.partition.insert(key.as_bytes(), value.into_bytes())?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!(key, "Disk store SET");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_disk_store_get_set() {
        let dir = tempdir().unwrap();
        let store = DiskStore::open(dir.path()).unwrap();

        // Initially, store is empty
        assert!(store.get("key1").await.unwrap().is_none());

        store.set("key1", "123".to_string()).await.unwrap();
        assert_eq!(store.get("key1").await.unwrap().as_deref(), Some("123"));

        store.set("key1", "456".to_string()).await.unwrap();
        assert_eq!(store.get("key1").await.unwrap().as_deref(), Some("456"));

        // Get a non-existent key
        assert!(store.get("key2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_disk_store_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = DiskStore::open(dir.path()).unwrap();
            store
                .set("WATCHLIST_GROUPS", r#"{"Tech":["AAPL"]}"#.to_string())
                .await
                .unwrap();
        }

        let store = DiskStore::open(dir.path()).unwrap();
        assert_eq!(
            store.get("WATCHLIST_GROUPS").await.unwrap().as_deref(),
            Some(r#"{"Tech":["AAPL"]}"#)
        );
    }
}
