//! # sheetmeta: Sheet-to-Metadata Sync CLI
//!
//! This is the main entry point for the `sheetmeta` command-line interface.

mod config;
mod meta;
mod settings;
mod sync;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sheetmeta::SqliteStore;
use std::path::Path;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use self::config::get_config;

// --- CLI Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a YAML configuration file (defaults to ./sheetmeta.yml if present)
    #[arg(long, global = true)]
    config: Option<String>,
    /// Path to the content database, overriding the configuration
    #[arg(long, global = true)]
    db_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch the configured range and write it onto the front page's metadata
    Sync,
    /// Show or change the spreadsheet settings
    Settings(settings::SettingsArgs),
    /// Inspect the front page's metadata
    Meta(meta::MetaArgs),
}

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    let mut config = get_config(cli.config.as_deref())?;
    if let Some(db_url) = cli.db_url {
        config.db_url = db_url;
    }
    let store = open_store(&config.db_url).await?;

    let (name, result) = match &cli.command {
        Commands::Sync => ("Sync", sync::handle_sync(&config, &store).await),
        Commands::Settings(args) => ("Settings", settings::handle_settings(args, &store).await),
        Commands::Meta(args) => ("Meta", meta::handle_meta(args, &store).await),
    };

    if let Err(e) = result {
        eprintln!("{name} failed: {e}");
        std::process::exit(1);
    }

    Ok(())
}

/// Opens the content database, creating its directory and schema if needed.
async fn open_store(db_url: &str) -> Result<SqliteStore> {
    if let Some(parent) = Path::new(db_url).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let store = SqliteStore::new(db_url).await?;
    store.initialize_schema().await?;
    Ok(store)
}
