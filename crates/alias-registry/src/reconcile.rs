//! Merge an observed directory structure with known entries.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::entry::Entry;
use crate::slug::ClaimedIds;

/// Build the registry for exactly the `observed` paths, sorted by path.
///
/// Entries whose path was observed are reused unchanged, keeping their ID
/// and aliases. New paths get an entry named after their last segment with a
/// fresh ID from `claimed`. Known paths that were not observed are dropped.
///
/// `existing` should already be ID-migrated, with `claimed` holding its IDs.
pub fn reconcile(
    observed: &BTreeSet<String>,
    existing: Vec<Entry>,
    mut claimed: ClaimedIds,
) -> (Vec<Entry>, ClaimedIds) {
    let mut by_path: HashMap<String, Entry> = existing
        .into_iter()
        .map(|entry| (entry.path.clone(), entry))
        .collect();

    let mut added = 0usize;
    let items: Vec<Entry> = observed
        .iter()
        .map(|path| {
            by_path.remove(path).unwrap_or_else(|| {
                let name = path.rsplit('/').next().unwrap_or(path);
                added += 1;
                Entry::new(claimed.allocate(name), name, path.as_str())
            })
        })
        .collect();

    debug!(added, dropped = by_path.len(), "reconciled structure");
    (items, claimed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrate::migrate_ids;

    fn observed(paths: &[&str]) -> BTreeSet<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    fn with_alias(id: &str, name: &str, path: &str, alias: &[&str]) -> Entry {
        Entry {
            alias: alias.iter().map(|a| a.to_string()).collect(),
            ..Entry::new(id, name, path)
        }
    }

    #[test]
    fn keeps_existing_and_adds_new() {
        let existing = vec![with_alias("song-a", "Song A", "Folder1/Song A", &[])];
        let claimed: ClaimedIds = ["song-a"].into_iter().collect();
        let (items, _) = reconcile(
            &observed(&["Folder1/Song B", "Folder1/Song A"]),
            existing,
            claimed,
        );

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].path, "Folder1/Song A");
        assert_eq!(items[0].id, "song-a");
        assert_eq!(items[1].path, "Folder1/Song B");
        assert_eq!(items[1].id, "song-b");
        assert_eq!(items[1].name, "Song B");
        assert!(items[1].alias.is_empty());
    }

    #[test]
    fn preserves_id_and_alias() {
        let existing = vec![with_alias("custom", "Song", "A/Song", &["first", "second"])];
        let claimed: ClaimedIds = ["custom"].into_iter().collect();
        let (items, _) = reconcile(&observed(&["A/Song"]), existing.clone(), claimed);
        assert_eq!(items, existing);
    }

    #[test]
    fn drops_unobserved_paths() {
        let existing = vec![
            with_alias("y", "Y", "X/Y", &[]),
            with_alias("z", "Z", "X/Z", &["keep me?"]),
        ];
        let claimed: ClaimedIds = ["y", "z"].into_iter().collect();
        let (items, _) = reconcile(&observed(&["X/Y"]), existing, claimed);
        assert_eq!(items.len(), 1);
        assert!(items.iter().all(|e| e.path != "X/Z"));
    }

    #[test]
    fn new_ids_avoid_existing_ones() {
        // "song" belongs to an entry at a different path.
        let existing = vec![with_alias("song", "Song", "A/Song", &[])];
        let claimed: ClaimedIds = ["song"].into_iter().collect();
        let (items, claimed) = reconcile(&observed(&["A/Song", "B/Song", "C/Song"]), existing, claimed);
        let ids: Vec<_> = items.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["song", "song-2", "song-3"]);
        assert_eq!(claimed.len(), 3);
    }

    #[test]
    fn dropped_ids_stay_claimed_for_the_run() {
        let existing = vec![with_alias("song", "Song", "Old/Song", &[])];
        let claimed: ClaimedIds = ["song"].into_iter().collect();
        let (items, _) = reconcile(&observed(&["New/Song"]), existing, claimed);
        assert_eq!(items[0].id, "song-2");
    }

    #[test]
    fn duplicate_path_later_entry_wins() {
        let existing = vec![
            with_alias("a", "x", "A/x", &["first"]),
            with_alias("b", "x", "A/x", &["second"]),
        ];
        let (migrated, claimed) = migrate_ids(existing, ClaimedIds::new());
        let (items, claimed) = reconcile(&observed(&["A/x", "A/y"]), migrated, claimed);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "b");
        assert_eq!(items[0].alias, vec!["second"]);
        assert_eq!(items[1].path, "A/y");
        assert_eq!(items[1].id, "y");
        // The shadowed entry's ID is still taken for the rest of the run.
        assert!(claimed.contains("a"));
    }

    #[test]
    fn empty_observation_empties_registry() {
        let existing = vec![with_alias("a", "A", "X/A", &[])];
        let (items, _) = reconcile(&BTreeSet::new(), existing, ClaimedIds::new());
        assert!(items.is_empty());
    }

    #[test]
    fn output_is_sorted_with_unique_ids() {
        let existing = vec![
            with_alias("", "b", "Z/b", &[]),
            with_alias("Z/a", "a", "Z/a", &["x"]),
        ];
        let (migrated, claimed) = migrate_ids(existing, ClaimedIds::new());
        let (items, _) = reconcile(&observed(&["Z/b", "A/a", "Z/a", "M/b"]), migrated, claimed);

        let paths: Vec<_> = items.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["A/a", "M/b", "Z/a", "Z/b"]);

        let ids: BTreeSet<_> = items.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), items.len());
        assert!(items.iter().all(Entry::has_valid_id));

        let kept = items.iter().find(|e| e.path == "Z/a").unwrap();
        assert_eq!(kept.alias, vec!["x"]);
    }
}
