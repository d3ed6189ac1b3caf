use super::ui;
use crate::core::watchlist::{Watchlist, WatchlistGroups};
use anyhow::Result;
use comfy_table::Cell;

/// Watchlist operations reachable from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchlistCommand {
    List,
    Show { group: String },
    AddGroup { name: String },
    DeleteGroup { name: String },
    Toggle { group: String, symbol: String },
}

pub fn render_groups(groups: &WatchlistGroups) -> String {
    if groups.is_empty() {
        return ui::style_text("Your watchlists will appear here.", ui::StyleType::Subtle);
    }
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Watchlist"), ui::header_cell("Stocks")]);
    for (name, stocks) in groups {
        table.add_row(vec![Cell::new(name), Cell::new(stocks.len())]);
    }
    table.to_string()
}

pub fn render_group(name: &str, groups: &WatchlistGroups) -> String {
    let title = ui::style_text(name, ui::StyleType::Title);
    match groups.get(name) {
        None => format!(
            "{title}\n{}",
            ui::style_text("No such watchlist.", ui::StyleType::Error)
        ),
        Some(stocks) if stocks.is_empty() => format!(
            "{title}\n{}",
            ui::style_text(&format!("No stocks in {name}"), ui::StyleType::Subtle)
        ),
        Some(stocks) => {
            let mut table = ui::new_styled_table();
            table.set_header(vec![ui::header_cell("Symbol")]);
            for symbol in stocks {
                table.add_row(vec![Cell::new(symbol)]);
            }
            format!("{title}\n{table}")
        }
    }
}

pub async fn run(command: WatchlistCommand, watchlist: &Watchlist) -> Result<()> {
    match command {
        WatchlistCommand::List => {
            println!("{}", render_groups(&watchlist.load().await?));
        }
        WatchlistCommand::Show { group } => {
            println!("{}", render_group(&group, &watchlist.load().await?));
        }
        WatchlistCommand::AddGroup { name } => {
            if watchlist.add_group(&name).await? {
                println!("Created watchlist {}", ui::style_text(name.trim(), ui::StyleType::Label));
            } else {
                println!(
                    "{}",
                    ui::style_text(
                        "Watchlist name is empty or already exists.",
                        ui::StyleType::Error
                    )
                );
            }
        }
        WatchlistCommand::DeleteGroup { name } => {
            if watchlist.delete_group(&name).await? {
                println!("Deleted watchlist {}", ui::style_text(&name, ui::StyleType::Label));
            } else {
                println!("{}", ui::style_text("No such watchlist.", ui::StyleType::Error));
            }
        }
        WatchlistCommand::Toggle { group, symbol } => {
            let (group, symbol) = (group.trim(), symbol.trim().to_uppercase());
            if group.is_empty() || symbol.is_empty() {
                println!(
                    "{}",
                    ui::style_text("Watchlist and symbol are required.", ui::StyleType::Error)
                );
            } else if watchlist.toggle_symbol(group, &symbol).await? {
                println!("Added {symbol} to {group}");
            } else {
                println!("Removed {symbol} from {group}");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_commands_update_the_record() -> Result<()> {
        let watchlist = Watchlist::new(Arc::new(MemoryStore::new()));

        run(WatchlistCommand::AddGroup { name: "Tech".to_string() }, &watchlist).await?;
        run(
            WatchlistCommand::Toggle {
                group: "Tech".to_string(),
                symbol: " aapl ".to_string(),
            },
            &watchlist,
        )
        .await?;
        assert_eq!(watchlist.groups_containing("AAPL").await?, vec!["Tech"]);

        run(
            WatchlistCommand::DeleteGroup { name: "Tech".to_string() },
            &watchlist,
        )
        .await?;
        assert!(watchlist.load().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_render_groups() -> Result<()> {
        let watchlist = Watchlist::new(Arc::new(MemoryStore::new()));
        assert!(render_groups(&watchlist.load().await?).contains("Your watchlists will appear here."));

        watchlist.add_group("Cars").await?;
        watchlist.toggle_symbol("Tech", "MSFT").await?;
        let groups = watchlist.load().await?;

        let output = render_groups(&groups);
        assert!(output.contains("Cars"));
        assert!(output.contains("Tech"));

        assert!(render_group("Cars", &groups).contains("No stocks in Cars"));
        assert!(render_group("Tech", &groups).contains("MSFT"));
        assert!(render_group("Nope", &groups).contains("No such watchlist."));
        Ok(())
    }
}
