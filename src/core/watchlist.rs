//! Persisted watchlist groups
//!
//! The whole mapping lives under a single store key. Every mutation re-reads the record,
//! applies the change and writes the complete mapping back; there are no per-group
//! writes and no caching layer in between.

use crate::core::cache::KeyValueStore;
use crate::core::error::WatchlistError;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, instrument};

pub const WATCHLIST_KEY: &str = "WATCHLIST_GROUPS";

/// Group name to the ticker symbols it holds. Group names are case-sensitive.
pub type WatchlistGroups = BTreeMap<String, BTreeSet<String>>;

pub struct Watchlist {
    store: Arc<dyn KeyValueStore>,
}

impl Watchlist {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> Result<WatchlistGroups, WatchlistError> {
        let raw = self
            .store
            .get(WATCHLIST_KEY)
            .await
            .map_err(WatchlistError::Read)?;
        match raw {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => {
                debug!("No watchlist record found");
                Ok(WatchlistGroups::new())
            }
        }
    }

    async fn save(&self, groups: &WatchlistGroups) -> Result<(), WatchlistError> {
        let raw = serde_json::to_string(groups)?;
        self.store
            .set(WATCHLIST_KEY, raw)
            .await
            .map_err(WatchlistError::Write)?;
        debug!(groups = groups.len(), "Saved watchlist record");
        Ok(())
    }

    /// Adds an empty group. Returns `false` without writing when the name is blank or
    /// already taken.
    #[instrument(skip(self))]
    pub async fn add_group(&self, name: &str) -> Result<bool, WatchlistError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(false);
        }
        let mut groups = self.load().await?;
        if groups.contains_key(name) {
            return Ok(false);
        }
        groups.insert(name.to_string(), BTreeSet::new());
        self.save(&groups).await?;
        Ok(true)
    }

    /// Removes a group. Returns whether it existed.
    #[instrument(skip(self))]
    pub async fn delete_group(&self, name: &str) -> Result<bool, WatchlistError> {
        let mut groups = self.load().await?;
        if groups.remove(name).is_none() {
            return Ok(false);
        }
        self.save(&groups).await?;
        Ok(true)
    }

    /// Adds `symbol` to `group` if absent, removes it if present. The group is created
    /// when missing. Returns whether the symbol is in the group afterwards; a blank group
    /// or symbol returns `false` without writing.
    #[instrument(skip(self))]
    pub async fn toggle_symbol(&self, group: &str, symbol: &str) -> Result<bool, WatchlistError> {
        let (group, symbol) = (group.trim(), symbol.trim());
        if group.is_empty() || symbol.is_empty() {
            return Ok(false);
        }
        let mut groups = self.load().await?;
        let stocks = groups.entry(group.to_string()).or_default();
        let member = if stocks.remove(symbol) {
            false
        } else {
            stocks.insert(symbol.to_string());
            true
        };
        self.save(&groups).await?;
        Ok(member)
    }

    pub async fn groups_containing(&self, symbol: &str) -> Result<Vec<String>, WatchlistError> {
        Ok(self
            .load()
            .await?
            .into_iter()
            .filter(|(_, stocks)| stocks.contains(symbol))
            .map(|(name, _)| name)
            .collect())
    }
}
