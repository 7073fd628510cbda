//! Registry entries and schema versions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Schema version written by this crate.
pub const CURRENT_VERSION: i64 = 3;

/// One registry record: a remote directory with its stable ID and aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Stable slug, unique across the registry.
    pub id: String,
    /// Last path segment.
    pub name: String,
    /// `parent/child` path relative to the listing root.
    pub path: String,
    /// User-supplied alternate names, carried forward verbatim.
    #[serde(default)]
    pub alias: Vec<String>,
}

impl Entry {
    /// Build a fresh entry for a newly observed path.
    pub fn new(id: impl Into<String>, name: impl Into<String>, path: impl Into<String>) -> Self {
        Entry {
            id: id.into(),
            name: name.into(),
            path: path.into(),
            alias: Vec::new(),
        }
    }

    /// Decode an item from the `items` array (or a bare array).
    ///
    /// A missing `id` falls back to `path`, then `name`.
    pub(crate) fn from_item(obj: &Map<String, Value>) -> Self {
        let name = string_field(obj, "name").unwrap_or_default();
        let path = string_field(obj, "path").unwrap_or_default();
        let id = string_field(obj, "id")
            .or_else(|| string_field(obj, "path"))
            .or_else(|| string_field(obj, "name"))
            .unwrap_or_default();
        Entry {
            id,
            name,
            path,
            alias: alias_field(obj),
        }
    }

    /// Decode a value from the legacy name-keyed object.
    ///
    /// A missing `id` falls back to `path`, then the key itself.
    pub(crate) fn from_legacy(key: &str, obj: &Map<String, Value>) -> Self {
        let path = string_field(obj, "path").unwrap_or_default();
        let id = string_field(obj, "id")
            .or_else(|| string_field(obj, "path"))
            .unwrap_or_else(|| key.to_string());
        Entry {
            id,
            name: key.to_string(),
            path,
            alias: alias_field(obj),
        }
    }

    /// Whether the ID is a usable stable ID (ignoring uniqueness).
    pub fn has_valid_id(&self) -> bool {
        !self.id.is_empty() && !self.id.contains('/')
    }
}

/// Detected schema of a loaded registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVersion {
    /// Unversioned object keyed by directory name.
    Legacy,
    /// A registry carrying (or defaulting to) a numeric version.
    Versioned(i64),
}

impl SchemaVersion {
    /// Whether this is the stable-ID schema or newer.
    pub fn is_current(&self) -> bool {
        matches!(self, SchemaVersion::Versioned(v) if *v >= CURRENT_VERSION)
    }
}

/// Read a field as a non-empty string.
///
/// Non-zero numbers and `true` are stringified; empty strings, zero, `false`
/// and `null` count as missing so the fallback chain moves on.
fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

fn alias_field(obj: &Map<String, Value>) -> Vec<String> {
    match obj.get("alias") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn item_id_fallback_chain() {
        let full = Entry::from_item(&obj(json!({
            "id": "song-a", "name": "Song A", "path": "F/Song A", "alias": ["x"]
        })));
        assert_eq!(full.id, "song-a");
        assert_eq!(full.alias, vec!["x"]);

        let no_id = Entry::from_item(&obj(json!({"name": "Song A", "path": "F/Song A"})));
        assert_eq!(no_id.id, "F/Song A");

        let name_only = Entry::from_item(&obj(json!({"name": "Song A"})));
        assert_eq!(name_only.id, "Song A");
        assert_eq!(name_only.path, "");

        let empty = Entry::from_item(&obj(json!({})));
        assert_eq!(empty.id, "");
        assert!(empty.alias.is_empty());
    }

    #[test]
    fn legacy_id_falls_back_to_key() {
        let with_path = Entry::from_legacy("Song A", &obj(json!({"path": "X/Y"})));
        assert_eq!(with_path.id, "X/Y");
        assert_eq!(with_path.name, "Song A");

        let bare = Entry::from_legacy("Song A", &obj(json!({})));
        assert_eq!(bare.id, "Song A");
    }

    #[test]
    fn non_list_alias_is_empty() {
        let e = Entry::from_item(&obj(json!({"id": "a", "alias": "not-a-list"})));
        assert!(e.alias.is_empty());
    }

    #[test]
    fn non_string_alias_elements_dropped() {
        let e = Entry::from_item(&obj(json!({"id": "a", "alias": ["a", 1, null, "b", ["c"]]})));
        assert_eq!(e.alias, vec!["a", "b"]);

        let legacy = Entry::from_legacy("K", &obj(json!({"alias": [true, "only"]})));
        assert_eq!(legacy.alias, vec!["only"]);
    }

    #[test]
    fn valid_id_rules() {
        assert!(Entry::new("song-a", "Song A", "F/Song A").has_valid_id());
        assert!(!Entry::new("", "Song A", "F/Song A").has_valid_id());
        assert!(!Entry::new("F/Song A", "Song A", "F/Song A").has_valid_id());
    }

    #[test]
    fn current_version_detection() {
        assert!(SchemaVersion::Versioned(3).is_current());
        assert!(SchemaVersion::Versioned(4).is_current());
        assert!(!SchemaVersion::Versioned(2).is_current());
        assert!(!SchemaVersion::Legacy.is_current());
    }
}
