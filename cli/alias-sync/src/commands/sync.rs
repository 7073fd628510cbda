//! The default command: update or migrate the registry.

use anyhow::{Context, Result};
use tracing::info;

use alias_registry::{HttpListing, Mode, Outcome, SyncOptions};

use crate::config::{Settings, API_URL_ENV};

/// Run `alias-sync [--migrate-only] [--force]`.
///
/// Without an API URL the run degrades to migration only.
pub fn run(settings: &Settings, migrate_only: bool, force: bool) -> Result<Outcome> {
    let options = SyncOptions { force };
    let registry = &settings.registry;

    let outcome = match (&settings.api_url, migrate_only) {
        (_, true) => alias_registry::sync::run(registry, Mode::MigrateOnly, options),
        (Some(url), false) => {
            let listing = HttpListing::new(url, settings.timeout)
                .with_context(|| format!("creating HTTP client for {url}"))?;
            alias_registry::sync::run(registry, Mode::Update(&listing), options)
        }
        (None, false) => {
            info!("{API_URL_ENV} not set, the latest structure needs the API; migrating IDs only");
            alias_registry::sync::run(registry, Mode::MigrateOnly, options)
        }
    }
    .with_context(|| format!("syncing {}", registry.display()))?;

    println!("{}", outcome.status_line(registry));
    Ok(outcome)
}
