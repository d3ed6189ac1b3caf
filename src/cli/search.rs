use super::ui;
use crate::core::config::SearchConfig;
use crate::core::debounce::Debouncer;
use crate::core::error::FetchError;
use crate::core::market::{MarketDataExt, MarketDataProvider};
use crate::core::stock::SearchMatch;
use anyhow::{Context, Result};
use comfy_table::Cell;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

/// Matches shown for a query.
pub const MAX_RESULTS: usize = 6;

/// Searches for `query`. Queries shorter than `min_len` characters (after trimming) yield
/// no results and never reach the provider.
pub async fn search(
    provider: &dyn MarketDataProvider,
    query: &str,
    min_len: usize,
) -> Result<Vec<SearchMatch>, FetchError> {
    let query = query.trim();
    if query.chars().count() < min_len {
        debug!(query, "Query below minimum length");
        return Ok(Vec::new());
    }
    provider.search_symbols(query).await
}

pub fn render_results(query: &str, results: &Result<Vec<SearchMatch>, FetchError>) -> String {
    let matches = match results {
        Ok(matches) => matches,
        Err(_) => return ui::style_text("Search failed.", ui::StyleType::Error),
    };
    if matches.is_empty() {
        return ui::style_text(
            &format!("No results for \"{}\"", query.trim()),
            ui::StyleType::Subtle,
        );
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Symbol"),
        ui::header_cell("Name"),
        ui::header_cell("Region"),
    ]);
    for m in matches.iter().take(MAX_RESULTS) {
        table.add_row(vec![
            Cell::new(&m.symbol),
            Cell::new(&m.name),
            ui::optional_cell(m.region.as_deref()),
        ]);
    }
    table.to_string()
}

/// One-shot search for the given keywords.
pub async fn run(
    provider: &dyn MarketDataProvider,
    keywords: &str,
    config: &SearchConfig,
) -> Result<()> {
    let pb = ui::new_spinner("Searching...");
    let results = search(provider, keywords, config.min_query_len).await;
    pb.finish_and_clear();

    println!("{}", render_results(keywords, &results));
    results
        .map(|_| ())
        .context("Failed to load data. Please try again.")
}

/// Reads queries line by line from stdin. Each line replaces the pending query; a search
/// is sent only after the input has been quiet for the configured debounce window.
pub async fn run_interactive(
    provider: Arc<dyn MarketDataProvider>,
    config: &SearchConfig,
) -> Result<()> {
    let min_len = config.min_query_len;
    let debouncer = Debouncer::new(
        Duration::from_millis(config.debounce_ms),
        move |query: String| {
            let provider = provider.clone();
            async move {
                if query.trim().is_empty() {
                    return;
                }
                let results = search(provider.as_ref(), &query, min_len).await;
                if let Err(e) = &results {
                    tracing::warn!(error = %e, "Search failed");
                }
                println!("{}", render_results(&query, &results));
            }
        },
    );

    println!(
        "{}",
        ui::style_text(
            "Type to search. Press Ctrl-D to quit.",
            ui::StyleType::Subtle
        )
    );
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        debouncer.call(line);
    }
    debouncer.finish().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::request::MarketRequest;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct SearchOnlyProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MarketDataProvider for SearchOnlyProvider {
        async fn fetch(&self, request: &MarketRequest) -> Result<Value, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let matches: Vec<Value> = (0..8)
                .map(|i| json!({"1. symbol": format!("AP{i}"), "2. name": format!("Apple {i}")}))
                .collect();
            match request {
                MarketRequest::Search { keywords } if keywords == "fail" => {
                    Err(FetchError::Provider {
                        function: request.function(),
                        message: "rate limited".to_string(),
                    })
                }
                _ => Ok(json!({ "bestMatches": matches })),
            }
        }
    }

    fn provider() -> SearchOnlyProvider {
        SearchOnlyProvider {
            calls: AtomicUsize::new(0),
        }
    }

    #[tokio::test]
    async fn test_short_query_never_fetches() {
        let provider = provider();
        assert!(search(&provider, "a", 2).await.unwrap().is_empty());
        assert!(search(&provider, "  a  ", 2).await.unwrap().is_empty());
        assert!(search(&provider, "", 2).await.unwrap().is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);

        assert_eq!(search(&provider, "ap", 2).await.unwrap().len(), 8);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_render_results_limits_rows() {
        let provider = provider();
        let results = search(&provider, "apple", 2).await;
        let output = render_results("apple", &results);
        assert!(output.contains("AP0"));
        assert!(output.contains("AP5"));
        assert!(!output.contains("AP6"));
    }

    #[tokio::test]
    async fn test_failed_search_is_an_error() {
        let provider = provider();
        let err = run(&provider, "fail", &SearchConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to load data. Please try again.");
        assert!(matches!(
            err.downcast_ref::<FetchError>(),
            Some(FetchError::Provider { .. })
        ));

        assert!(run(&provider, "apple", &SearchConfig::default()).await.is_ok());
    }

    #[tokio::test]
    async fn test_render_failure_and_empty() {
        let provider = provider();
        let results = search(&provider, "fail", 2).await;
        assert!(render_results("fail", &results).contains("Search failed."));

        let results = search(&provider, "x", 2).await;
        assert!(render_results("x", &results).contains("No results"));
    }
}
