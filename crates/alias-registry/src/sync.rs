//! Top-level update and migration flow.
//!
//! ```text
//! MigrateOnly: load -> needs upgrade? -> migrate -> write | no-op
//! Update:      load -> fetch -> migrate -> reconcile -> changed? -> write | no-op
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use tracing::{info, warn};

use crate::entry::{Entry, SchemaVersion, CURRENT_VERSION};
use crate::error::Result;
use crate::listing::{fetch_structure, DirectoryListing};
use crate::load::load_registry;
use crate::migrate::{migrate_ids, needs_id_upgrade};
use crate::reconcile::reconcile;
use crate::slug::ClaimedIds;
use crate::store::save_registry;

/// What a run should do.
#[derive(Clone, Copy)]
pub enum Mode<'a> {
    /// Only normalize IDs and schema; no network access.
    MigrateOnly,
    /// Fetch the remote structure and reconcile against it.
    Update(&'a dyn DirectoryListing),
}

/// Run options.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Rewrite the registry even when nothing changed.
    pub force: bool,
}

/// Why a registry was written during an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAction {
    /// `force` was requested.
    Forced,
    /// The source registry predated version 3.
    MigratedAndUpdated,
    /// A current registry whose paths or aliases changed.
    Updated,
}

impl WriteAction {
    /// Human-readable label used in status lines.
    pub fn label(&self) -> &'static str {
        match self {
            WriteAction::Forced => "Forced write",
            WriteAction::MigratedAndUpdated => "Migrated & updated",
            WriteAction::Updated => "Updated",
        }
    }
}

/// Terminal state of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Migration requested but the registry is already stable.
    AlreadyCurrent,
    /// IDs and schema were migrated without contacting the API.
    Migrated { count: usize },
    /// The reconciled registry matches the file on disk.
    NoChanges,
    /// The reconciled registry was written.
    Written { action: WriteAction, count: usize },
    /// The root listing failed; the registry was left untouched.
    FetchFailed { detail: String },
}

impl Outcome {
    /// Whether the registry file was (re)written.
    pub fn wrote(&self) -> bool {
        matches!(self, Outcome::Migrated { .. } | Outcome::Written { .. })
    }

    /// Status line naming the registry file.
    pub fn status_line(&self, registry: &Path) -> String {
        StatusLine {
            outcome: self,
            file: registry
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| registry.display().to_string()),
        }
        .to_string()
    }
}

struct StatusLine<'a> {
    outcome: &'a Outcome,
    file: String,
}

impl fmt::Display for StatusLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = &self.file;
        match self.outcome {
            Outcome::AlreadyCurrent => write!(f, "Already stable version 3, no action."),
            Outcome::Migrated { count } => {
                write!(f, "Migrated {file} to version 3, total items: {count}")
            }
            Outcome::NoChanges => write!(f, "No changes (already v3 IDs)."),
            Outcome::Written { action, count } => {
                write!(f, "{} {file} (v3), total items: {count}", action.label())
            }
            Outcome::FetchFailed { detail } => {
                write!(f, "Remote listing unavailable, {file} left untouched ({detail}).")
            }
        }
    }
}

/// Run one sync pass against the registry at `path`.
///
/// Only registry write failures are errors; everything else ends in an
/// [`Outcome`].
pub fn run(path: &Path, mode: Mode<'_>, options: SyncOptions) -> Result<Outcome> {
    let (entries, version) = load_registry(path).into_parts();
    info!(path = %path.display(), items = entries.len(), ?version, "loaded registry");

    match mode {
        Mode::MigrateOnly => migrate_only(path, entries, version),
        Mode::Update(listing) => update(path, listing, entries, version, options),
    }
}

fn migrate_only(path: &Path, entries: Vec<Entry>, version: SchemaVersion) -> Result<Outcome> {
    if !needs_id_upgrade(&entries, version) {
        return Ok(Outcome::AlreadyCurrent);
    }
    let (migrated, _) = migrate_ids(entries, ClaimedIds::new());
    save_registry(path, &migrated)?;
    Ok(Outcome::Migrated {
        count: migrated.len(),
    })
}

fn update(
    path: &Path,
    listing: &dyn DirectoryListing,
    entries: Vec<Entry>,
    version: SchemaVersion,
    options: SyncOptions,
) -> Result<Outcome> {
    let structure = match fetch_structure(listing) {
        Ok(structure) => structure,
        Err(e) => {
            warn!(error = %e, "root listing failed, not touching registry");
            return Ok(Outcome::FetchFailed {
                detail: e.to_string(),
            });
        }
    };

    let before = fingerprint(&entries);
    let (migrated, claimed) = migrate_ids(entries, ClaimedIds::new());
    let (items, _) = reconcile(&structure, migrated, claimed);

    // Only an exact version 3 file may skip the write; newer tags are rewritten.
    let canonical = version == SchemaVersion::Versioned(CURRENT_VERSION);
    if canonical && !options.force && before == fingerprint(&items) {
        return Ok(Outcome::NoChanges);
    }

    save_registry(path, &items)?;
    let action = if options.force {
        WriteAction::Forced
    } else if !version.is_current() {
        WriteAction::MigratedAndUpdated
    } else {
        WriteAction::Updated
    };
    Ok(Outcome::Written {
        action,
        count: items.len(),
    })
}

/// The user-visible content of a registry: each path with its aliases.
fn fingerprint(entries: &[Entry]) -> BTreeSet<(String, Vec<String>)> {
    entries
        .iter()
        .map(|e| (e.path.clone(), e.alias.clone()))
        .collect()
}
