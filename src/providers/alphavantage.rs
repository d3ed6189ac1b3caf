use crate::core::config::AlphaVantageConfig;
use crate::core::error::FetchError;
use crate::core::market::MarketDataProvider;
use crate::core::request::MarketRequest;
use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, instrument};

/// Keys Alpha Vantage uses to report a failed call inside a 200 response.
const ERROR_KEY: &str = "Error Message";
const NOTICE_KEYS: [&str; 2] = ["Note", "Information"];

pub struct AlphaVantageProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl AlphaVantageProvider {
    pub fn new(config: &AlphaVantageConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent("stockwatch/1.0")
            .build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            client,
        })
    }

    fn url(&self, request: &MarketRequest) -> Result<Url, FetchError> {
        let mut query = vec![("function", request.function().to_string())];
        query.extend(request.params());
        query.push(("apikey", self.api_key.clone()));

        Url::parse_with_params(&format!("{}/query", self.base_url), &query).map_err(|e| {
            FetchError::InvalidRequest(format!("Invalid base URL {}: {}", self.base_url, e))
        })
    }
}

/// Message of an error or rate-limit notice embedded in a successful response.
fn provider_error(value: &Value) -> Option<String> {
    let object = value.as_object()?;
    let message = match object.get(ERROR_KEY) {
        Some(message) => message,
        None if object.len() == 1 => NOTICE_KEYS.iter().find_map(|key| object.get(*key))?,
        None => return None,
    };
    Some(
        message
            .as_str()
            .map_or_else(|| message.to_string(), str::to_string),
    )
}

#[async_trait]
impl MarketDataProvider for AlphaVantageProvider {
    #[instrument(
        name = "AlphaVantageFetch",
        skip(self, request),
        fields(function = request.function())
    )]
    async fn fetch(&self, request: &MarketRequest) -> Result<Value, FetchError> {
        let function = request.function();
        let url = self.url(request)?;
        debug!(params = ?request.params(), "Requesting market data");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status(),
                function,
            });
        }

        let text = response.text().await?;
        let value: Value =
            serde_json::from_str(&text).map_err(|source| FetchError::Decode { function, source })?;

        if let Some(message) = provider_error(&value) {
            return Err(FetchError::Provider { function, message });
        }
        Ok(value)
    }
}
