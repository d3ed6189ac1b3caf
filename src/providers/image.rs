use crate::core::config::ImageProviderConfig;
use crate::core::stock::StockSummary;
use async_trait::async_trait;
use futures::future::join_all;
use tracing::debug;

/// Reports whether an image URL can be loaded. Never fails: any error means "no".
#[async_trait]
pub trait ImageProbe: Send + Sync {
    async fn is_reachable(&self, url: &str) -> bool;
}

pub struct HttpImageProbe {
    client: reqwest::Client,
}

impl HttpImageProbe {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpImageProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageProbe for HttpImageProbe {
    async fn is_reachable(&self, url: &str) -> bool {
        match self.client.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Image probe failed for {}: {}", url, e);
                false
            }
        }
    }
}

/// Logo URL candidate for a symbol, or `None` when there is no symbol.
pub fn logo_url(config: &ImageProviderConfig, symbol: &str) -> Option<String> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return None;
    }
    Some(format!(
        "{}/image-stock/{}.png",
        config.base_url.trim_end_matches('/'),
        symbol.to_uppercase()
    ))
}

/// Replaces the image placeholder with the logo URL when it is reachable.
pub async fn enrich_image(
    mut stock: StockSummary,
    config: &ImageProviderConfig,
    probe: &dyn ImageProbe,
) -> StockSummary {
    if let Some(url) = logo_url(config, &stock.symbol) {
        if probe.is_reachable(&url).await {
            stock.image = url;
        }
    }
    stock
}

/// Probes every stock's logo concurrently.
pub async fn enrich_images(
    stocks: Vec<StockSummary>,
    config: &ImageProviderConfig,
    probe: &dyn ImageProbe,
) -> Vec<StockSummary> {
    join_all(
        stocks
            .into_iter()
            .map(|stock| enrich_image(stock, config, probe)),
    )
    .await
}
