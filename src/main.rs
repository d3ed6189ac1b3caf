use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use stockwatch::AppCommand;
use stockwatch::cli::watchlist::WatchlistCommand;
use stockwatch::core::log::init_logging;
use stockwatch::core::series::Timeframe;
use stockwatch::core::stock::MoverKind;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum MoverArg {
    Gainers,
    Losers,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show top gainers and losers
    Explore,
    /// List all gainers or losers, one page at a time
    Movers {
        #[arg(value_enum)]
        kind: MoverArg,
        /// Page to show, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Search symbols by keyword
    Search {
        /// Read queries from stdin as they are typed
        #[arg(short, long)]
        interactive: bool,
        keywords: Vec<String>,
    },
    /// Show company details and a price chart
    Details {
        symbol: String,
        /// One of 1D, 1W, 1M, 3M, 1Y
        #[arg(short, long, default_value = "1W")]
        timeframe: String,
    },
    /// Manage watchlists
    #[command(subcommand)]
    Watchlist(WatchlistArgs),
}

#[derive(Subcommand)]
enum WatchlistArgs {
    /// List all watchlists
    List,
    /// Show the stocks in a watchlist
    Show { group: String },
    /// Create an empty watchlist
    AddGroup { name: String },
    /// Delete a watchlist
    DeleteGroup { name: String },
    /// Add a symbol to a watchlist, or remove it if already present
    Toggle { group: String, symbol: String },
}

impl From<WatchlistArgs> for WatchlistCommand {
    fn from(args: WatchlistArgs) -> Self {
        match args {
            WatchlistArgs::List => WatchlistCommand::List,
            WatchlistArgs::Show { group } => WatchlistCommand::Show { group },
            WatchlistArgs::AddGroup { name } => WatchlistCommand::AddGroup { name },
            WatchlistArgs::DeleteGroup { name } => WatchlistCommand::DeleteGroup { name },
            WatchlistArgs::Toggle { group, symbol } => WatchlistCommand::Toggle { group, symbol },
        }
    }
}

impl From<Commands> for AppCommand {
    fn from(cmd: Commands) -> AppCommand {
        match cmd {
            Commands::Explore => AppCommand::Explore,
            Commands::Movers { kind, page } => AppCommand::Movers {
                kind: match kind {
                    MoverArg::Gainers => MoverKind::Gainers,
                    MoverArg::Losers => MoverKind::Losers,
                },
                page,
            },
            Commands::Search {
                interactive: true, ..
            } => AppCommand::InteractiveSearch,
            Commands::Search { keywords, .. } => AppCommand::Search {
                keywords: keywords.join(" "),
            },
            Commands::Details { symbol, timeframe } => AppCommand::Details {
                symbol,
                timeframe: Timeframe::from_tag(&timeframe),
            },
            Commands::Watchlist(args) => AppCommand::Watchlist(args.into()),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => stockwatch::cli::setup::setup_at_path(path),
            None => stockwatch::cli::setup::setup(),
        },
        Some(cmd) => stockwatch::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
