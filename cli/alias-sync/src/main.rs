//! alias-sync — generate, update and migrate `alias.json` registries.

mod commands;
mod config;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use config::{Overrides, Settings, SyncConfig, API_URL_ENV};

#[derive(Parser)]
#[command(
    name = "alias-sync",
    version,
    about = "Generate / migrate alias.json (version 3 with stable IDs)"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Only migrate the registry format; do not call the API
    #[arg(long)]
    migrate_only: bool,
    /// Rewrite the registry even if nothing changed
    #[arg(long)]
    force: bool,
    /// Registry file (default: from alias-sync.toml, else ./alias.json)
    #[arg(long, global = true)]
    registry: Option<PathBuf>,
    /// Listing API base URL (overrides API_URL and alias-sync.toml)
    #[arg(long)]
    api_url: Option<String>,
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Find entries whose name or alias contains QUERY
    Search {
        /// Case-insensitive search text
        query: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

/// Log to stderr, honouring `RUST_LOG` when set.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let config = SyncConfig::find_and_load(&cwd)?;
    let settings = Settings::resolve(
        &cwd,
        Overrides {
            registry: cli.registry,
            api_url: cli.api_url,
        },
        std::env::var(API_URL_ENV).ok(),
        config,
    );
    tracing::debug!(?settings, "resolved settings");

    match cli.command {
        Some(Commands::Search { query }) => {
            commands::search::run(&settings, &query)?;
        }
        None => {
            commands::sync::run(&settings, cli.migrate_only, cli.force)?;
        }
    }
    Ok(())
}
