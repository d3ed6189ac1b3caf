use super::ui;
use crate::core::error::{StoreError, WatchlistError};
use crate::core::market::{MarketDataExt, MarketDataProvider};
use crate::core::series::{Chart, SeriesSet, Timeframe, summarize_chart};
use crate::core::stock::CompanyOverview;
use crate::core::watchlist::Watchlist;
use anyhow::{Context, Result};
use comfy_table::Cell;

const INSUFFICIENT_DATA: &str = "Insufficient data to display chart.";

pub fn render_overview(symbol: &str, overview: &CompanyOverview) -> String {
    let name = overview.name.as_deref().unwrap_or(symbol);
    let mut heading = symbol.to_string();
    if let Some(exchange) = overview.exchange.as_deref() {
        heading.push_str(&format!(" · {exchange}"));
    }

    let mut output = format!(
        "{}\n{}\n",
        ui::style_text(name, ui::StyleType::Title),
        ui::style_text(&heading, ui::StyleType::Subtle)
    );
    if let Some(description) = overview.description.as_deref().filter(|d| !d.is_empty()) {
        output.push_str(&format!("\n{description}\n"));
    }

    let stats = [
        ("Sector", &overview.sector),
        ("Industry", &overview.industry),
        ("Market Cap", &overview.market_capitalization),
        ("P/E Ratio", &overview.pe_ratio),
        ("Dividend Yield", &overview.dividend_yield),
        ("Beta", &overview.beta),
        ("52W High", &overview.week_52_high),
        ("52W Low", &overview.week_52_low),
        ("Profit Margin", &overview.profit_margin),
    ];
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Key Stat"), ui::header_cell("Value")]);
    for (label, value) in stats {
        table.add_row(vec![Cell::new(label), ui::optional_cell(value.as_deref())]);
    }
    output.push('\n');
    output.push_str(&table.to_string());
    output
}

/// Timeframe selector with the active entry highlighted.
fn render_tabs(selected: Timeframe) -> String {
    Timeframe::ALL
        .iter()
        .map(|tf| {
            if *tf == selected {
                ui::style_text(&format!("[{tf}]"), ui::StyleType::Label)
            } else {
                ui::style_text(&format!(" {tf} "), ui::StyleType::Subtle)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render_chart(series: &[f64], timeframe: Timeframe) -> String {
    let mut output = format!("{}\n\n", render_tabs(timeframe));
    let summary = match summarize_chart(series) {
        Chart::Insufficient => {
            output.push_str(&ui::style_text(INSUFFICIENT_DATA, ui::StyleType::Subtle));
            return output;
        }
        Chart::Ready(summary) => summary,
    };

    let (arrow, style) = if summary.is_up() {
        ("▲", ui::StyleType::Up)
    } else {
        ("▼", ui::StyleType::Down)
    };
    output.push_str(&format!(
        "${:.2} {}\n\n",
        summary.latest,
        ui::style_text(
            &format!(
                "{arrow} {:+.2} ({:+.2}%)",
                summary.change, summary.change_pct
            ),
            style
        )
    ));

    let [top, upper, lower, bottom] = summary.y_labels;
    output.push_str(&format!(
        "{}\n{}   {}\n{}\n",
        ui::style_text(&format!("{top:>10.2} ┐"), ui::StyleType::Subtle),
        ui::style_text(&format!("{upper:>10.2} │"), ui::StyleType::Subtle),
        ui::sparkline(series),
        ui::style_text(&format!("{lower:>10.2} │"), ui::StyleType::Subtle),
    ));
    output.push_str(&ui::style_text(
        &format!("{bottom:>10.2} ┘"),
        ui::StyleType::Subtle,
    ));
    output
}

pub fn render_membership(groups: &[String]) -> String {
    if groups.is_empty() {
        ui::style_text("Not in any watchlist", ui::StyleType::Subtle)
    } else {
        format!("In watchlists: {}", groups.join(", "))
    }
}

/// Watchlists holding `symbol`. An unavailable store is reported, never read as empty.
pub async fn membership(
    watchlist: Result<&Watchlist, &StoreError>,
    symbol: &str,
) -> Result<Vec<String>, WatchlistError> {
    match watchlist {
        Ok(watchlist) => watchlist.groups_containing(symbol).await,
        Err(e) => Err(WatchlistError::Read(e.clone())),
    }
}

/// Detail screen for one symbol: overview, price chart and watchlist membership.
pub async fn run(
    provider: &dyn MarketDataProvider,
    watchlist: Result<&Watchlist, &StoreError>,
    symbol: &str,
    timeframe: Timeframe,
) -> Result<()> {
    let symbol = symbol.trim().to_uppercase();

    let pb = ui::new_spinner(&format!("Loading {symbol}..."));
    let (overview, series, groups) = tokio::join!(
        provider.company_overview(&symbol),
        provider.time_series_set(&symbol),
        membership(watchlist, &symbol),
    );
    pb.finish_and_clear();

    let overview = overview.context("Failed to load company details.")?;
    println!("{}", render_overview(&symbol, &overview));
    ui::print_separator();

    let series = match series {
        Ok(set) => set,
        Err(e) => {
            tracing::warn!(error = %e, "No price history available");
            SeriesSet::default()
        }
    };
    println!("{}", render_chart(&series.series_for(timeframe), timeframe));
    ui::print_separator();

    match groups {
        Ok(groups) => println!("{}", render_membership(&groups)),
        Err(e) => println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[test]
    fn test_render_overview_fills_missing_stats() {
        let overview = CompanyOverview {
            name: Some("International Business Machines".to_string()),
            exchange: Some("NYSE".to_string()),
            sector: Some("TECHNOLOGY".to_string()),
            beta: Some("None".to_string()),
            ..Default::default()
        };
        let output = render_overview("IBM", &overview);
        assert!(output.contains("International Business Machines"));
        assert!(output.contains("IBM · NYSE"));
        assert!(output.contains("TECHNOLOGY"));
        assert!(output.contains("N/A"));

        let output = render_overview("XYZ", &CompanyOverview::default());
        assert!(output.contains("XYZ"));
    }

    #[test]
    fn test_render_chart() {
        let output = render_chart(&[100.0, 105.0, 110.0], Timeframe::OneWeek);
        assert!(output.contains("[1W]"));
        assert!(output.contains("$110.00"));
        assert!(output.contains("+10.00%"));
        assert!(output.contains("▲"));

        let output = render_chart(&[110.0, 100.0], Timeframe::OneYear);
        assert!(output.contains("▼"));
        assert!(output.contains("-10.00"));
    }

    #[test]
    fn test_render_chart_insufficient_data() {
        assert!(render_chart(&[], Timeframe::OneDay).contains(INSUFFICIENT_DATA));
        assert!(render_chart(&[42.0], Timeframe::OneDay).contains(INSUFFICIENT_DATA));
        assert!(render_chart(&[f64::NAN, f64::NAN], Timeframe::OneDay).contains(INSUFFICIENT_DATA));
    }

    #[test]
    fn test_render_chart_never_shows_nan() {
        let output = render_chart(&[f64::NAN, 100.0, 90.0, f64::NAN], Timeframe::OneMonth);
        assert!(!output.contains("NaN"));
        assert!(output.contains("$90.00"));
        assert!(output.contains("-10.00%"));
    }

    #[tokio::test]
    async fn test_membership_surfaces_store_failure() {
        let error = StoreError::Backend("Not a directory".to_string());
        let result = membership(Err(&error), "IBM").await;
        let err = result.unwrap_err();
        assert!(matches!(err, WatchlistError::Read(_)));
        assert_eq!(
            err.to_string(),
            "Failed to load watchlists: Store backend error: Not a directory"
        );

        let watchlist = Watchlist::new(std::sync::Arc::new(MemoryStore::new()));
        watchlist.toggle_symbol("Tech", "IBM").await.unwrap();
        assert_eq!(
            membership(Ok(&watchlist), "IBM").await.unwrap(),
            vec!["Tech".to_string()]
        );
    }

    #[test]
    fn test_render_membership() {
        assert!(render_membership(&[]).contains("Not in any watchlist"));
        assert_eq!(
            render_membership(&["Cars".to_string(), "Tech".to_string()]),
            "In watchlists: Cars, Tech"
        );
    }
}
