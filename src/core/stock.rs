//! Typed views over provider payloads and the uniform stock summary

use serde::{Deserialize, Deserializer, Serialize};

/// Sentinel used for `StockSummary::image` until a logo URL is confirmed reachable.
pub const IMAGE_PLACEHOLDER: &str = "placeholder";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSummary {
    pub name: String,
    pub symbol: String,
    pub price: String,
    pub change: String,
    pub image: String,
}

impl StockSummary {
    pub fn has_image(&self) -> bool {
        !self.image.is_empty() && self.image != IMAGE_PLACEHOLDER
    }
}

/// A mover field as found on the wire.
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseValue {
    Text(String),
    Number(serde_json::Number),
    Other(serde::de::IgnoredAny),
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<LooseValue>::deserialize(deserializer)? {
        Some(LooseValue::Text(text)) => Some(text),
        Some(LooseValue::Number(number)) => Some(number.to_string()),
        Some(LooseValue::Other(_)) | None => None,
    })
}

/// A "mover" record as returned by the top gainers/losers listing. Providers disagree on
/// field names, so every known spelling is optional and `summarize` coalesces them.
/// Values may arrive as strings or numbers; any other JSON type counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MoverRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub ticker: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub price: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub close: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub change: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub change_amount: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub change_percentage: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub volume: Option<String>,
}

/// First non-empty value in precedence order.
fn first_of<'a>(candidates: &[&'a Option<String>]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|c| (*c).as_deref())
        .find(|s| !s.is_empty())
}

impl MoverRecord {
    /// Display name: `name`, then `symbol`, then `ticker`.
    pub fn display_name(&self) -> &str {
        first_of(&[&self.name, &self.symbol, &self.ticker]).unwrap_or_default()
    }

    /// Ticker identity: `ticker`, then `symbol`, then `name`.
    pub fn identity(&self) -> &str {
        first_of(&[&self.ticker, &self.symbol, &self.name]).unwrap_or_default()
    }

    /// Price: `price`, then `close`.
    pub fn quoted_price(&self) -> Option<&str> {
        first_of(&[&self.price, &self.close])
    }

    pub fn summarize(&self) -> StockSummary {
        StockSummary {
            name: self.display_name().to_string(),
            symbol: self.identity().to_string(),
            price: self.quoted_price().unwrap_or_default().to_string(),
            change: first_of(&[&self.change]).unwrap_or_default().to_string(),
            image: IMAGE_PLACEHOLDER.to_string(),
        }
    }
}

pub fn summarize_mover(record: &MoverRecord) -> StockSummary {
    record.summarize()
}

/// `TOP_GAINERS_LOSERS` payload.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TopMovers {
    #[serde(default)]
    pub metadata: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub top_gainers: Vec<MoverRecord>,
    #[serde(default)]
    pub top_losers: Vec<MoverRecord>,
    #[serde(default)]
    pub most_actively_traded: Vec<MoverRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoverKind {
    Gainers,
    Losers,
}

impl TopMovers {
    pub fn records(&self, kind: MoverKind) -> &[MoverRecord] {
        match kind {
            MoverKind::Gainers => &self.top_gainers,
            MoverKind::Losers => &self.top_losers,
        }
    }
}

/// `OVERVIEW` payload. Alpha Vantage spells keys in PascalCase.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompanyOverview {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub exchange: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub market_capitalization: Option<String>,
    #[serde(default, rename = "PERatio")]
    pub pe_ratio: Option<String>,
    #[serde(default)]
    pub dividend_yield: Option<String>,
    #[serde(default)]
    pub beta: Option<String>,
    #[serde(default, rename = "52WeekHigh")]
    pub week_52_high: Option<String>,
    #[serde(default, rename = "52WeekLow")]
    pub week_52_low: Option<String>,
    #[serde(default)]
    pub profit_margin: Option<String>,
}

/// One `bestMatches` entry of a `SYMBOL_SEARCH` payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SearchMatch {
    #[serde(default, rename = "1. symbol", alias = "symbol")]
    pub symbol: String,
    #[serde(default, rename = "2. name", alias = "name")]
    pub name: String,
    #[serde(default, rename = "3. type")]
    pub kind: Option<String>,
    #[serde(default, rename = "4. region")]
    pub region: Option<String>,
    #[serde(default, rename = "8. currency")]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default, rename = "bestMatches")]
    pub best_matches: Vec<SearchMatch>,
}

/// One page of a paginated listing. Page numbers are 1-based and clamp into range.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub page: usize,
    pub total_pages: usize,
}

pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total_pages = items.len().div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);
    let start = ((page - 1) * page_size).min(items.len());
    let end = (start + page_size).min(items.len());
    Page {
        items: &items[start..end],
        page,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: &str) -> MoverRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_ticker_with_close_price() {
        let summary = summarize_mover(&record(r#"{"ticker": "AAPL", "close": "150.2"}"#));
        assert_eq!(summary.symbol, "AAPL");
        assert_eq!(summary.name, "AAPL");
        assert_eq!(summary.price, "150.2");
        assert_eq!(summary.change, "");
        assert_eq!(summary.image, IMAGE_PLACEHOLDER);
        assert!(!summary.has_image());
    }

    #[test]
    fn test_symbol_with_name_and_price() {
        let summary = summarize_mover(&record(
            r#"{"symbol": "TSLA", "name": "Tesla", "price": "700", "change": "+2.1%"}"#,
        ));
        assert_eq!(summary.symbol, "TSLA");
        assert_eq!(summary.name, "Tesla");
        assert_eq!(summary.price, "700");
        assert_eq!(summary.change, "+2.1%");
    }

    #[test]
    fn test_ticker_takes_precedence_for_identity() {
        let summary = summarize_mover(&record(
            r#"{"ticker": "GOOG", "symbol": "GOOGL", "name": "Alphabet", "price": "1", "close": "2"}"#,
        ));
        assert_eq!(summary.symbol, "GOOG");
        assert_eq!(summary.name, "Alphabet");
        assert_eq!(summary.price, "1");
    }

    #[test]
    fn test_empty_fields_fall_through() {
        let summary = summarize_mover(&record(
            r#"{"ticker": "", "symbol": "NVDA", "name": "", "price": "", "close": "99.5"}"#,
        ));
        assert_eq!(summary.symbol, "NVDA");
        assert_eq!(summary.name, "NVDA");
        assert_eq!(summary.price, "99.5");
    }

    #[test]
    fn test_empty_record() {
        let summary = summarize_mover(&MoverRecord::default());
        assert_eq!(summary.name, "");
        assert_eq!(summary.symbol, "");
        assert_eq!(summary.price, "");
    }

    #[test]
    fn test_top_movers_deserialization() {
        let payload = r#"{
            "metadata": "Top gainers, losers, and most actively traded US tickers",
            "last_updated": "2024-01-05 16:15:59 US/Eastern",
            "top_gainers": [
                {"ticker": "ABCD", "price": "1.23", "change_amount": "0.5", "change_percentage": "68.4%", "volume": "1000"}
            ]
        }"#;
        let movers: TopMovers = serde_json::from_str(payload).unwrap();
        assert_eq!(movers.records(MoverKind::Gainers).len(), 1);
        assert!(movers.records(MoverKind::Losers).is_empty());
        assert_eq!(movers.top_gainers[0].identity(), "ABCD");
        assert_eq!(
            movers.top_gainers[0].change_percentage.as_deref(),
            Some("68.4%")
        );
    }

    #[test]
    fn test_mixed_value_types_in_movers() {
        let movers: TopMovers = serde_json::from_str(
            r#"{"top_gainers": [
                {"ticker": "A", "price": "1"},
                {"ticker": "B", "price": 1.5, "change": -2, "volume": 1200},
                {"ticker": "C", "close": 7, "name": null, "change": true}
            ]}"#,
        )
        .unwrap();

        let summaries: Vec<StockSummary> = movers
            .records(MoverKind::Gainers)
            .iter()
            .map(summarize_mover)
            .collect();
        assert_eq!(summaries[0].price, "1");
        assert_eq!(summaries[1].price, "1.5");
        assert_eq!(summaries[1].change, "-2");
        assert_eq!(movers.top_gainers[1].volume.as_deref(), Some("1200"));
        assert_eq!(summaries[2].price, "7");
        assert_eq!(summaries[2].name, "C");
        assert_eq!(summaries[2].change, "");
    }

    #[test]
    fn test_overview_and_search_deserialization() {
        let overview: CompanyOverview = serde_json::from_str(
            r#"{"Symbol": "IBM", "Name": "International Business Machines", "PERatio": "22.1", "52WeekHigh": "199.18"}"#,
        )
        .unwrap();
        assert_eq!(overview.symbol.as_deref(), Some("IBM"));
        assert_eq!(overview.pe_ratio.as_deref(), Some("22.1"));
        assert_eq!(overview.week_52_high.as_deref(), Some("199.18"));
        assert!(overview.sector.is_none());

        let search: SearchResponse = serde_json::from_str(
            r#"{"bestMatches": [{"1. symbol": "TSCO.LON", "2. name": "Tesco PLC", "4. region": "United Kingdom"}]}"#,
        )
        .unwrap();
        assert_eq!(search.best_matches[0].symbol, "TSCO.LON");
        assert_eq!(search.best_matches[0].name, "Tesco PLC");

        let empty: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.best_matches.is_empty());
    }

    #[test]
    fn test_pagination_clamps() {
        let items: Vec<u32> = (1..=23).collect();

        let first = paginate(&items, 1, 10);
        assert_eq!(first.items, &items[0..10]);
        assert_eq!(first.total_pages, 3);

        let last = paginate(&items, 3, 10);
        assert_eq!(last.items, &[21, 22, 23]);

        let beyond = paginate(&items, 9, 10);
        assert_eq!(beyond.page, 3);

        let before = paginate(&items, 0, 10);
        assert_eq!(before.page, 1);

        let empty: Vec<u32> = vec![];
        let page = paginate(&empty, 1, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
    }
}
