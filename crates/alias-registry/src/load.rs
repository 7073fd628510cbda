//! Registry loading across every historical file shape.
//!
//! Accepted inputs:
//! ```text
//! {"version": 3, "items": [{...}, ...]}   — versioned (version defaults to 2)
//! [{...}, ...]                            — bare array, version 2
//! {"Song A": {"path": "...", ...}, ...}   — legacy name-keyed object
//! ```

use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use crate::entry::{Entry, SchemaVersion};

/// Result of reading a registry file.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The file parsed into one of the known shapes.
    Loaded {
        entries: Vec<Entry>,
        version: SchemaVersion,
    },
    /// No file at the given path.
    Missing,
    /// The file exists but could not be read or is not a known shape.
    Corrupt { detail: String },
}

impl LoadOutcome {
    /// Collapse to the best-effort view: anything unreadable is an empty
    /// legacy registry.
    pub fn into_parts(self) -> (Vec<Entry>, SchemaVersion) {
        match self {
            LoadOutcome::Loaded { entries, version } => (entries, version),
            LoadOutcome::Missing | LoadOutcome::Corrupt { .. } => {
                (Vec::new(), SchemaVersion::Legacy)
            }
        }
    }
}

/// Load a registry file.
///
/// Never fails: I/O and parse problems are reported through
/// [`LoadOutcome::Corrupt`].
pub fn load_registry(path: &Path) -> LoadOutcome {
    if !path.exists() {
        debug!(path = %path.display(), "no existing registry");
        return LoadOutcome::Missing;
    }

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read registry, starting empty");
            return LoadOutcome::Corrupt {
                detail: e.to_string(),
            };
        }
    };

    let outcome = parse_registry(&content);
    if let LoadOutcome::Corrupt { detail } = &outcome {
        warn!(path = %path.display(), %detail, "unusable registry, starting empty");
    }
    outcome
}

/// Parse registry JSON text into entries and a detected version.
pub fn parse_registry(content: &str) -> LoadOutcome {
    let data: Value = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(e) => {
            return LoadOutcome::Corrupt {
                detail: e.to_string(),
            }
        }
    };

    match data {
        Value::Object(map) => match map.get("items") {
            Some(Value::Array(items)) => {
                let entries = items
                    .iter()
                    .filter_map(Value::as_object)
                    .map(Entry::from_item)
                    .collect();
                let version = map
                    .get("version")
                    .and_then(Value::as_i64)
                    .map_or(SchemaVersion::Versioned(2), SchemaVersion::Versioned);
                LoadOutcome::Loaded { entries, version }
            }
            _ => {
                let entries = map
                    .iter()
                    .filter_map(|(key, val)| val.as_object().map(|obj| Entry::from_legacy(key, obj)))
                    .collect();
                LoadOutcome::Loaded {
                    entries,
                    version: SchemaVersion::Legacy,
                }
            }
        },
        Value::Array(items) => LoadOutcome::Loaded {
            entries: items
                .iter()
                .filter_map(Value::as_object)
                .map(Entry::from_item)
                .collect(),
            version: SchemaVersion::Versioned(2),
        },
        other => LoadOutcome::Corrupt {
            detail: format!("unexpected top-level JSON {}", kind_name(&other)),
        },
    }
}

fn kind_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
