//! Stable-ID migration for legacy registries.

use std::collections::HashSet;

use tracing::debug;

use crate::entry::{Entry, SchemaVersion};
use crate::slug::ClaimedIds;

/// Give every entry a valid, unique ID.
///
/// An existing ID survives when it is non-empty, contains no `/`, and was
/// not already claimed earlier in the list; anything else is regenerated
/// from the entry's name. Returns the migrated entries together with the
/// claimed set so later allocations cannot collide with them.
pub fn migrate_ids(entries: Vec<Entry>, mut claimed: ClaimedIds) -> (Vec<Entry>, ClaimedIds) {
    let migrated = entries
        .into_iter()
        .map(|mut entry| {
            if entry.has_valid_id() && claimed.claim(&entry.id) {
                return entry;
            }
            let new_id = claimed.allocate(&entry.name);
            debug!(old = %entry.id, new = %new_id, path = %entry.path, "reassigned id");
            entry.id = new_id;
            entry
        })
        .collect();
    (migrated, claimed)
}

/// Whether a loaded registry must be migrated before it is stable.
///
/// True for anything older than version 3, or any empty, path-shaped or
/// duplicated ID.
pub fn needs_id_upgrade(entries: &[Entry], version: SchemaVersion) -> bool {
    if !version.is_current() {
        return true;
    }
    let mut seen = HashSet::new();
    entries
        .iter()
        .any(|e| !e.has_valid_id() || !seen.insert(e.id.as_str()))
}
