//! # Salon Ledger CLI Library
//!
//! Argument parsing, logging setup and command dispatch for the `salon`
//! binary. Every command returns the text it wants printed so it can be
//! tested without a terminal.
//!
//! ## Module Organization
//! ```text
//! salon_cli/
//! ├── lib.rs            ◄─── You are here (arguments & dispatch)
//! ├── commands/
//! │   ├── mod.rs        ◄─── Output format helpers
//! │   ├── reports.rs    ◄─── summary, items, daily, categories, jobs
//! │   ├── pricing.rs    ◄─── simulate
//! │   ├── sale.rs       ◄─── record
//! │   ├── migrate.rs    ◄─── migrate
//! │   └── customers.rs  ◄─── customers
//! └── error.rs          ◄─── CliError for commands
//! ```
//!
//! ## Data Directory Resolution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  --data-dir DIR  ──►  SALON_DATA_DIR  ──►  salon.toml  ──►  default    │
//! │  (highest)                                                 (lowest)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use salon_store::{Store, StoreConfig};

pub use error::{CliError, CliResult, ErrorCode};

#[derive(Debug, Parser)]
#[command(name = "salon")]
#[command(about = "Salon ledger reports, pricing simulation and sale entry")]
#[command(
    after_help = concat!(
        "Environment:\n",
        "  SALON_DATA_DIR   Data directory\n",
        "  SALON_CONFIG     Config file path\n",
        "  RUST_LOG         Log filter (default info,salon=debug)",
    )
)]
pub struct Cli {
    /// Directory holding jobs.csv and the JSON stores
    #[arg(long, global = true, env = "SALON_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Config file (TOML)
    #[arg(long, global = true, env = "SALON_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Headline numbers for the whole ledger
    Summary,

    /// Per-item profit report
    Items {
        /// Report services instead of products
        #[arg(long, default_value_t = false)]
        services: bool,
        /// Show at most N rows
        #[arg(long)]
        top: Option<usize>,
    },

    /// Daily revenue (or profit) series
    Daily {
        #[arg(long, default_value_t = false)]
        profit: bool,
    },

    /// Revenue, cost and profit per category
    Categories,

    /// Ledger rows, newest first
    Jobs {
        /// Show at most N rows
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Price increase projections per item
    Simulate {
        /// Try a custom price for one item, e.g. --price "Haircut=350"
        #[arg(
            long = "price",
            value_name = "ITEM=PRICE",
            value_parser = commands::pricing::parse_custom_price
        )]
        prices: Vec<(String, f64)>,
    },

    /// Record one sale
    Record {
        #[arg(long)]
        item: String,
        /// YYYY-MM-DD, default today
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        customer: Option<String>,
        #[arg(long, default_value_t = 1)]
        quantity: i64,
        /// Unit price, default the catalog price
        #[arg(long)]
        price: Option<f64>,
        /// Unit cost, default the catalog cost
        #[arg(long)]
        cost: Option<f64>,
    },

    /// Rewrite the ledger into the migrated layout (one time)
    Migrate {
        #[arg(long, default_value_t = false)]
        no_backup: bool,
    },

    /// List or search customers
    Customers {
        /// Name substring
        #[arg(long)]
        search: Option<String>,
        /// Phone digits
        #[arg(long)]
        phone: Option<String>,
    },
}

/// Runs the parsed command and returns what it wants printed.
pub fn run(cli: &Cli) -> CliResult<String> {
    let store = Store::open(resolve_config(cli)?)?;
    debug!(data_dir = ?store.config().data_dir, "Store opened");
    dispatch(&store, &cli.command, cli.json)
}

/// Runs one command against an open store.
pub fn dispatch(store: &Store, command: &Command, json: bool) -> CliResult<String> {
    use commands::*;

    match command {
        Command::Summary => reports::summary(store, json),
        Command::Items { services, top } => reports::items(store, *services, *top, json),
        Command::Daily { profit } => reports::daily(store, *profit, json),
        Command::Categories => reports::categories(store, json),
        Command::Jobs { limit } => reports::jobs(store, *limit, json),
        Command::Simulate { prices } => pricing::simulate(store, prices, json),
        Command::Record {
            item,
            date,
            customer,
            quantity,
            price,
            cost,
        } => sale::record(
            store,
            sale::RecordArgs {
                item,
                date: date.as_deref(),
                customer: customer.as_deref(),
                quantity: *quantity,
                price: *price,
                cost: *cost,
            },
            json,
        ),
        Command::Migrate { no_backup } => migrate::migrate(store, !*no_backup, json),
        Command::Customers { search, phone } => {
            customers::customers(store, search.as_deref(), phone.as_deref(), json)
        }
    }
}

/// Config file, then the `--data-dir` / `SALON_DATA_DIR` override.
fn resolve_config(cli: &Cli) -> CliResult<StoreConfig> {
    let mut config = StoreConfig::load(cli.config.clone())?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    info!(data_dir = ?config.data_dir, "Using data directory");
    Ok(config)
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so `--json` output stays parseable.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=salon_store=trace` - Trace the storage layer only
/// - Default: `info,salon=debug`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,salon=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
