//! Alias lookup.

use crate::entry::Entry;

/// Entries whose name or any alias contains `query`, case-insensitively.
///
/// The query is trimmed first; a blank query matches nothing.
pub fn search<'a>(entries: &'a [Entry], query: &str) -> Vec<&'a Entry> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return Vec::new();
    }
    entries
        .iter()
        .filter(|e| {
            e.name.to_lowercase().contains(&q)
                || e.alias.iter().any(|a| a.to_lowercase().contains(&q))
        })
        .collect()
}
