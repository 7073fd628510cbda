//! `alias-sync search`: look entries up by name or alias.

use anyhow::{bail, Result};

use alias_registry::{load_registry, LoadOutcome};

use crate::config::Settings;

/// Run `alias-sync search <query>`.
///
/// Prints one `id  path  [aliases]` line per match and returns the match
/// count.
pub fn run(settings: &Settings, query: &str) -> Result<usize> {
    let entries = match load_registry(&settings.registry) {
        LoadOutcome::Loaded { entries, .. } => entries,
        LoadOutcome::Missing => bail!("no registry at {}", settings.registry.display()),
        LoadOutcome::Corrupt { detail } => {
            bail!("cannot read {}: {detail}", settings.registry.display())
        }
    };

    let hits = alias_registry::search(&entries, query);
    if hits.is_empty() {
        println!("No matches for '{}'.", query.trim());
        return Ok(0);
    }

    let id_width = hits.iter().map(|e| e.id.len()).max().unwrap_or(0);
    for entry in &hits {
        if entry.alias.is_empty() {
            println!("{:<id_width$}  {}", entry.id, entry.path);
        } else {
            println!(
                "{:<id_width$}  {}  [{}]",
                entry.id,
                entry.path,
                entry.alias.join(", ")
            );
        }
    }
    Ok(hits.len())
}
