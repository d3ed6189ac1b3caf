//! Core data layer: requests, cache contract, normalizers and the watchlist

pub mod cache;
pub mod config;
pub mod debounce;
pub mod error;
pub mod log;
pub mod market;
pub mod request;
pub mod series;
pub mod stock;
pub mod watchlist;

// Re-export main types for cleaner imports
pub use cache::{CACHE_TTL, CacheEntry, KeyValueStore};
pub use error::{FetchError, StoreError, WatchlistError};
pub use market::{MarketDataExt, MarketDataProvider};
pub use request::{Granularity, IntradayInterval, MarketRequest};
pub use series::{Chart, ChartSummary, SeriesSet, Timeframe, extract_closing_prices};
pub use stock::{MoverRecord, StockSummary, summarize_mover};
pub use watchlist::{Watchlist, WatchlistGroups};
