use crate::core::series::plot_points;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Label,
    Up,
    Down,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Label => style(text).bold(),
        StyleType::Up => style(text).green().bold(),
        StyleType::Down => style(text).red().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Formats an optional provider string. Missing values are displayed as "N/A".
pub fn optional_cell(value: Option<&str>) -> Cell {
    match value.filter(|v| !v.is_empty() && *v != "None") {
        Some(v) => Cell::new(v),
        None => Cell::new("N/A").fg(Color::DarkGrey),
    }
}

/// Price cell; a missing price is shown as `$--`.
pub fn price_cell(price: &str) -> Cell {
    let text = if price.is_empty() { "$--" } else { price };
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// Creates a cell for displaying a provider change string with color coding.
pub fn change_cell(change: &str) -> Cell {
    if change.is_empty() {
        return Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right);
    }
    let color = if change.trim_start().starts_with('-') {
        Color::Red
    } else {
        Color::Green
    };
    Cell::new(change)
        .fg(color)
        .set_alignment(CellAlignment::Right)
}

/// Creates a spinner shown while waiting on the network.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Renders a series as a one-line sparkline. Non-finite values render as blanks.
pub fn sparkline(series: &[f64]) -> String {
    let top = (SPARK_LEVELS.len() - 1) as f64;
    let width = series.len().saturating_sub(1) as f64;
    plot_points(series, width, top)
        .into_iter()
        .map(|(_, y)| {
            if y.is_finite() {
                SPARK_LEVELS[(top - y).round().clamp(0.0, top) as usize]
            } else {
                ' '
            }
        })
        .collect()
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    println!("\n{}", "─".repeat(term_width));
}
