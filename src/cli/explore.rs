use super::ui;
use crate::core::config::ImageProviderConfig;
use crate::core::market::{MarketDataExt, MarketDataProvider};
use crate::core::stock::{MoverKind, StockSummary, TopMovers, paginate, summarize_mover};
use crate::providers::image::{ImageProbe, enrich_images};
use anyhow::{Context, Result};
use comfy_table::Cell;

/// Movers shown per section on the explore screen.
pub const PREVIEW_SIZE: usize = 4;
/// Rows per page on the "view all" listing.
pub const PAGE_SIZE: usize = 10;

const LOAD_FAILED: &str = "Failed to load data. Please try again.";

impl MoverKind {
    pub fn title(&self) -> &'static str {
        match self {
            MoverKind::Gainers => "Top Gainers",
            MoverKind::Losers => "Top Losers",
        }
    }
}

fn preview(movers: &TopMovers, kind: MoverKind) -> Vec<StockSummary> {
    movers
        .records(kind)
        .iter()
        .take(PREVIEW_SIZE)
        .map(summarize_mover)
        .collect()
}

pub fn render_section(kind: MoverKind, stocks: &[StockSummary]) -> String {
    let mut output = format!("{}\n", ui::style_text(kind.title(), ui::StyleType::Title));
    if stocks.is_empty() {
        output.push_str(&ui::style_text("No data available.", ui::StyleType::Subtle));
        return output;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Symbol"),
        ui::header_cell("Name"),
        ui::header_cell("Price"),
        ui::header_cell("Change"),
        ui::header_cell("Logo"),
    ]);
    for stock in stocks {
        let logo = if stock.has_image() {
            Cell::new(&stock.image)
        } else {
            Cell::new("-")
        };
        table.add_row(vec![
            Cell::new(&stock.symbol),
            Cell::new(&stock.name),
            ui::price_cell(&stock.price),
            ui::change_cell(&stock.change),
            logo,
        ]);
    }
    output.push_str(&table.to_string());
    output
}

/// One page of the full gainers or losers listing.
pub fn render_page(kind: MoverKind, stocks: &[StockSummary], page: usize) -> String {
    let page = paginate(stocks, page, PAGE_SIZE);

    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Symbol"), ui::header_cell("Price")]);
    for stock in page.items {
        table.add_row(vec![Cell::new(&stock.symbol), ui::price_cell(&stock.price)]);
    }

    format!(
        "{}\n{}\n{}",
        ui::style_text(kind.title(), ui::StyleType::Title),
        table,
        ui::style_text(
            &format!("Page {} of {}", page.page, page.total_pages),
            ui::StyleType::Subtle
        )
    )
}

async fn load_movers(provider: &dyn MarketDataProvider) -> Result<TopMovers> {
    let pb = ui::new_spinner("Loading market movers...");
    let movers = provider.top_movers().await;
    pb.finish_and_clear();
    movers.context(LOAD_FAILED)
}

/// Explore screen: a preview of top gainers and losers with logos where available.
pub async fn run(
    provider: &dyn MarketDataProvider,
    images: &ImageProviderConfig,
    probe: &dyn ImageProbe,
) -> Result<()> {
    let movers = load_movers(provider).await?;

    let (gainers, losers) = tokio::join!(
        enrich_images(preview(&movers, MoverKind::Gainers), images, probe),
        enrich_images(preview(&movers, MoverKind::Losers), images, probe),
    );

    println!("{}", render_section(MoverKind::Gainers, &gainers));
    ui::print_separator();
    println!("{}", render_section(MoverKind::Losers, &losers));
    Ok(())
}

/// Full listing of one mover kind, paginated.
pub async fn run_view_all(
    provider: &dyn MarketDataProvider,
    kind: MoverKind,
    page: usize,
) -> Result<()> {
    let movers = load_movers(provider).await?;
    let stocks: Vec<StockSummary> = movers.records(kind).iter().map(summarize_mover).collect();
    println!("{}", render_page(kind, &stocks, page));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stock::MoverRecord;

    fn movers(count: usize) -> TopMovers {
        let records = (0..count)
            .map(|i| MoverRecord {
                ticker: Some(format!("T{i:02}")),
                price: (i % 2 == 0).then(|| format!("{i}.5")),
                ..Default::default()
            })
            .collect();
        TopMovers {
            top_gainers: records,
            ..Default::default()
        }
    }

    #[test]
    fn test_preview_takes_first_four() {
        let stocks = preview(&movers(7), MoverKind::Gainers);
        let symbols: Vec<&str> = stocks.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, ["T00", "T01", "T02", "T03"]);
        assert!(preview(&movers(7), MoverKind::Losers).is_empty());
    }

    #[test]
    fn test_render_section() {
        let stocks = preview(&movers(2), MoverKind::Gainers);
        let output = render_section(MoverKind::Gainers, &stocks);
        assert!(output.contains("Top Gainers"));
        assert!(output.contains("T00"));
        assert!(output.contains("0.5"));
        // Missing price
        assert!(output.contains("$--"));

        let output = render_section(MoverKind::Losers, &[]);
        assert!(output.contains("No data available."));
    }

    #[test]
    fn test_render_page_is_clamped() {
        let stocks: Vec<StockSummary> = movers(23)
            .top_gainers
            .iter()
            .map(summarize_mover)
            .collect();

        let output = render_page(MoverKind::Gainers, &stocks, 3);
        assert!(output.contains("T22"));
        assert!(!output.contains("T19"));
        assert!(output.contains("Page 3 of 3"));

        let output = render_page(MoverKind::Gainers, &stocks, 99);
        assert!(output.contains("Page 3 of 3"));
    }
}
