//! # Kassa
//!
//! Terminal checkout for a small shop.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing()           logs to stderr, RUST_LOG overrides         │
//! │  2. AppConfig::load()        defaults → kassa.toml → KASSA_* env        │
//! │  3. CLI flags                --catalog / --discounts / --cart           │
//! │  4. Store::open_session()    Products.txt must load, the rest may fail  │
//! │  5. Shell::run()             command loop on stdin/stdout               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod commands;
mod config;
mod shell;

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use kassa_store::Store;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::shell::Shell;

/// Command-line flags.
#[derive(Parser, Debug)]
#[command(name = "kassa", version, about = "Terminal checkout for a small shop")]
struct Args {
    /// Config file (default: kassa.toml in the platform config directory)
    #[arg(long, env = "KASSA_CONFIG")]
    config: Option<PathBuf>,

    /// Product catalog file
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Discount code file
    #[arg(long)]
    discounts: Option<PathBuf>,

    /// Saved cart file
    #[arg(long)]
    cart: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();

    let mut config = AppConfig::load(args.config).context("Failed to load configuration")?;
    config.override_files(args.catalog, args.discounts, args.cart);

    info!(
        store = %config.store.name,
        catalog = %config.files.catalog.display(),
        save_on_exit = %config.session.save_on_exit,
        "Configuration loaded"
    );

    let store = Store::new(config.store_config());
    let opened = store
        .open_session()
        .with_context(|| format!("Could not start {}", config.store.name))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(opened.session, store, config, stdin.lock(), stdout.lock());

    shell.report_startup(
        &opened.rejected_products,
        &opened.rejected_codes,
        opened.cart_error.as_ref(),
    )?;
    shell.run()?;

    info!("Session closed");
    Ok(())
}

/// Initializes the tracing subscriber.
///
/// Logs go to stderr so they never mix with receipts on stdout.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kassa=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
