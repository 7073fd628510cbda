//! Canonical registry serialization.

use std::path::Path;

use serde::Serialize;

use crate::entry::{Entry, CURRENT_VERSION};
use crate::error::{RegistryError, Result};

#[derive(Serialize)]
struct RegistryDocument<'a> {
    version: i64,
    items: &'a [Entry],
}

/// Render entries as a version 3 registry document.
///
/// Four-space indentation; non-ASCII text is written as-is.
pub fn render_registry(items: &[Entry]) -> Result<String> {
    let doc = RegistryDocument {
        version: CURRENT_VERSION,
        items,
    };
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    doc.serialize(&mut ser)?;
    // serde_json only emits valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write entries to `path` as a version 3 registry, replacing the file.
pub fn save_registry(path: &Path, items: &[Entry]) -> Result<()> {
    let rendered = render_registry(items)?;
    std::fs::write(path, rendered).map_err(|source| RegistryError::Write {
        path: path.to_path_buf(),
        source,
    })
}
