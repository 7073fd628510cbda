//! Slug normalization and collision-free ID allocation.

use std::collections::HashSet;

/// Slug used when a name normalizes to nothing.
const FALLBACK_SLUG: &str = "item";

/// Normalize a display name into a URL- and filename-safe slug.
///
/// Lowercases, turns whitespace/underscore runs into `-`, drops anything
/// outside `[a-z0-9-]`, collapses repeated `-` and trims them from both ends.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;

    for c in name.trim().chars().flat_map(char::to_lowercase) {
        if c.is_whitespace() || c == '_' || c == '-' {
            pending_sep = true;
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            out.push(c);
        }
    }

    if out.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        out
    }
}

/// The set of IDs already handed out in a run.
///
/// Threaded by value through migration and reconciliation so that every
/// allocation is a function of its inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimedIds {
    ids: HashSet<String>,
}

impl ClaimedIds {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` is already taken.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Record `id` as taken. Returns `false` if it already was.
    pub fn claim(&mut self, id: &str) -> bool {
        self.ids.insert(id.to_string())
    }

    /// Number of claimed IDs.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing has been claimed yet.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Allocate a fresh ID derived from `name`, claiming it.
    ///
    /// The bare slug is used if free, otherwise the first of `slug-2`,
    /// `slug-3`, ... that is not yet claimed.
    pub fn allocate(&mut self, name: &str) -> String {
        let base = slugify(name);
        if self.claim(&base) {
            return base;
        }
        let mut n: u64 = 2;
        loop {
            let candidate = format!("{base}-{n}");
            if self.claim(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

impl<S: Into<String>> FromIterator<S> for ClaimedIds {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        ClaimedIds {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}
