pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::cli::watchlist::WatchlistCommand;
use crate::core::cache::KeyValueStore;
use crate::core::config::AppConfig;
use crate::core::series::Timeframe;
use crate::core::stock::MoverKind;
use crate::core::watchlist::Watchlist;
use crate::providers::CachedAlphaVantage;
use crate::providers::image::HttpImageProbe;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Explore,
    Movers { kind: MoverKind, page: usize },
    Search { keywords: String },
    InteractiveSearch,
    Details { symbol: String, timeframe: Timeframe },
    Watchlist(WatchlistCommand),
}

/// Cached Alpha Vantage client over `store`.
fn market_provider(
    config: &AppConfig,
    store: Arc<dyn KeyValueStore>,
) -> Result<Arc<CachedAlphaVantage>> {
    let provider = providers::cached_alphavantage(&config.providers.alphavantage, store)?;
    Ok(Arc::new(provider))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("stockwatch starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Explore => {
            let provider = market_provider(&config, store::open_cache(&config))?;
            cli::explore::run(
                provider.as_ref(),
                &config.providers.images,
                &HttpImageProbe::new(),
            )
            .await
        }
        AppCommand::Movers { kind, page } => {
            let provider = market_provider(&config, store::open_cache(&config))?;
            cli::explore::run_view_all(provider.as_ref(), kind, page).await
        }
        AppCommand::Search { keywords } => {
            let provider = market_provider(&config, store::open_cache(&config))?;
            cli::search::run(provider.as_ref(), &keywords, &config.search).await
        }
        AppCommand::InteractiveSearch => {
            let provider = market_provider(&config, store::open_cache(&config))?;
            cli::search::run_interactive(provider, &config.search).await
        }
        AppCommand::Details { symbol, timeframe } => {
            // Watchlists share the cache's store so the data directory is opened once.
            let (cache, persistent) = store::open_shared(&config);
            let provider = market_provider(&config, cache)?;
            let watchlist = persistent.map(Watchlist::new);
            cli::details::run(provider.as_ref(), watchlist.as_ref(), &symbol, timeframe).await
        }
        AppCommand::Watchlist(command) => {
            let store =
                store::open_persistent(&config).context("Failed to open watchlist store")?;
            cli::watchlist::run(command, &Watchlist::new(store)).await
        }
    }
}
