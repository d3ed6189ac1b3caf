//! Market data provider abstraction and typed accessors

use crate::core::error::FetchError;
use crate::core::request::{Granularity, IntradayInterval, MarketRequest};
use crate::core::series::SeriesSet;
use crate::core::stock::{CompanyOverview, SearchMatch, SearchResponse, TopMovers};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Source of raw JSON market data.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn fetch(&self, request: &MarketRequest) -> Result<Value, FetchError>;
}

fn decode<T: DeserializeOwned>(request: &MarketRequest, value: Value) -> Result<T, FetchError> {
    serde_json::from_value(value).map_err(|source| FetchError::Decode {
        function: request.function(),
        source,
    })
}

/// Typed helpers available on every provider.
#[async_trait]
pub trait MarketDataExt: MarketDataProvider {
    async fn top_movers(&self) -> Result<TopMovers, FetchError> {
        let request = MarketRequest::top_movers();
        let value = self.fetch(&request).await?;
        decode(&request, value)
    }

    async fn company_overview(&self, symbol: &str) -> Result<CompanyOverview, FetchError> {
        let request = MarketRequest::company_overview(symbol)?;
        let value = self.fetch(&request).await?;
        decode(&request, value)
    }

    /// Best matches for `keywords`; a payload without matches yields an empty list.
    async fn search_symbols(&self, keywords: &str) -> Result<Vec<SearchMatch>, FetchError> {
        let request = MarketRequest::search(keywords)?;
        let value = self.fetch(&request).await?;
        let response: SearchResponse = decode(&request, value)?;
        Ok(response.best_matches)
    }

    async fn time_series(
        &self,
        symbol: &str,
        granularity: Granularity,
    ) -> Result<Value, FetchError> {
        let request = MarketRequest::time_series(symbol, granularity)?;
        self.fetch(&request).await
    }

    /// Fetches the intraday, daily, weekly and monthly series concurrently. A failed
    /// granularity is left empty without affecting the others; only when every one of
    /// them fails is the first error returned.
    async fn time_series_set(&self, symbol: &str) -> Result<SeriesSet, FetchError> {
        let intraday = MarketRequest::time_series(
            symbol,
            Granularity::Intraday(IntradayInterval::FiveMinutes),
        )?;
        let daily = MarketRequest::time_series(symbol, Granularity::Daily)?;
        let weekly = MarketRequest::time_series(symbol, Granularity::Weekly)?;
        let monthly = MarketRequest::time_series(symbol, Granularity::Monthly)?;

        let (intraday, daily, weekly, monthly) = tokio::join!(
            self.fetch(&intraday),
            self.fetch(&daily),
            self.fetch(&weekly),
            self.fetch(&monthly),
        );

        let mut first_error = None;
        let mut keep = |result: Result<Value, FetchError>| match result {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, symbol, "Time series fetch failed");
                first_error.get_or_insert(e);
                None
            }
        };
        let set = SeriesSet {
            intraday: keep(intraday),
            daily: keep(daily),
            weekly: keep(weekly),
            monthly: keep(monthly),
        };

        match first_error {
            Some(e)
                if set.intraday.is_none()
                    && set.daily.is_none()
                    && set.weekly.is_none()
                    && set.monthly.is_none() =>
            {
                Err(e)
            }
            _ => Ok(set),
        }
    }
}

impl<T: MarketDataProvider + ?Sized> MarketDataExt for T {}
