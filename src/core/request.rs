//! Logical market data requests and the cache keys derived from them

use crate::core::error::FetchError;
use anyhow::anyhow;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IntradayInterval {
    OneMinute,
    #[default]
    FiveMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    SixtyMinutes,
}

impl IntradayInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntradayInterval::OneMinute => "1min",
            IntradayInterval::FiveMinutes => "5min",
            IntradayInterval::FifteenMinutes => "15min",
            IntradayInterval::ThirtyMinutes => "30min",
            IntradayInterval::SixtyMinutes => "60min",
        }
    }
}

impl Display for IntradayInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IntradayInterval {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1min" => Ok(IntradayInterval::OneMinute),
            "5min" => Ok(IntradayInterval::FiveMinutes),
            "15min" => Ok(IntradayInterval::FifteenMinutes),
            "30min" => Ok(IntradayInterval::ThirtyMinutes),
            "60min" => Ok(IntradayInterval::SixtyMinutes),
            _ => Err(anyhow!("Invalid intraday interval: {}", s)),
        }
    }
}

/// Sampling interval of a time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
    Intraday(IntradayInterval),
}

impl Granularity {
    fn function(&self) -> &'static str {
        match self {
            Granularity::Daily => "TIME_SERIES_DAILY",
            Granularity::Weekly => "TIME_SERIES_WEEKLY",
            Granularity::Monthly => "TIME_SERIES_MONTHLY",
            Granularity::Intraday(_) => "TIME_SERIES_INTRADAY",
        }
    }
}

impl Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Granularity::Daily => write!(f, "daily"),
            Granularity::Weekly => write!(f, "weekly"),
            Granularity::Monthly => write!(f, "monthly"),
            Granularity::Intraday(interval) => write!(f, "intraday_{interval}"),
        }
    }
}

/// A logical request against the market data provider.
///
/// Use the constructors: they reject empty symbols and keywords so that an invalid
/// request never reaches the cache or the network.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MarketRequest {
    TopMovers,
    CompanyOverview { symbol: String },
    Search { keywords: String },
    TimeSeries { symbol: String, granularity: Granularity },
}

fn require_non_empty(value: &str, what: &str) -> Result<String, FetchError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FetchError::InvalidRequest(format!("{what} must not be empty")));
    }
    Ok(value.to_string())
}

impl MarketRequest {
    pub fn top_movers() -> Self {
        MarketRequest::TopMovers
    }

    pub fn company_overview(symbol: &str) -> Result<Self, FetchError> {
        Ok(MarketRequest::CompanyOverview {
            symbol: require_non_empty(symbol, "symbol")?,
        })
    }

    pub fn search(keywords: &str) -> Result<Self, FetchError> {
        Ok(MarketRequest::Search {
            keywords: require_non_empty(keywords, "keywords")?,
        })
    }

    pub fn time_series(symbol: &str, granularity: Granularity) -> Result<Self, FetchError> {
        Ok(MarketRequest::TimeSeries {
            symbol: require_non_empty(symbol, "symbol")?,
            granularity,
        })
    }

    /// Provider function name for this request.
    pub fn function(&self) -> &'static str {
        match self {
            MarketRequest::TopMovers => "TOP_GAINERS_LOSERS",
            MarketRequest::CompanyOverview { .. } => "OVERVIEW",
            MarketRequest::Search { .. } => "SYMBOL_SEARCH",
            MarketRequest::TimeSeries { granularity, .. } => granularity.function(),
        }
    }

    /// Query parameters besides `function` and `apikey`.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            MarketRequest::TopMovers => vec![],
            MarketRequest::CompanyOverview { symbol } => vec![("symbol", symbol.clone())],
            MarketRequest::Search { keywords } => vec![("keywords", keywords.clone())],
            MarketRequest::TimeSeries {
                symbol,
                granularity: Granularity::Intraday(interval),
            } => vec![
                ("symbol", symbol.clone()),
                ("interval", interval.as_str().to_string()),
            ],
            MarketRequest::TimeSeries { symbol, .. } => vec![("symbol", symbol.clone())],
        }
    }

    /// Storage key for the cached response. Each variant owns a distinct prefix and the
    /// only free-form component is the trailing symbol or keywords.
    pub fn cache_key(&self) -> String {
        match self {
            MarketRequest::TopMovers => "av_top_movers".to_string(),
            MarketRequest::CompanyOverview { symbol } => format!("av_overview_{symbol}"),
            MarketRequest::Search { keywords } => format!("av_search_{keywords}"),
            MarketRequest::TimeSeries {
                symbol,
                granularity,
            } => format!("av_timeseries_{granularity}_{symbol}"),
        }
    }
}
