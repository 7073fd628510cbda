//! Remote directory listing and two-level structure discovery.
//!
//! The `DirectoryListing` trait abstracts over where directory contents come
//! from. `HttpListing` speaks the "repository contents" contract:
//!
//! ```text
//! GET {base}/.            -> [{"type": "dir", "name": "Folder1"}, ...]
//! GET {base}/Folder%201   -> [{"type": "dir", "name": "Song A"}, ...]
//! ```

use std::collections::BTreeSet;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{RegistryError, Result};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// One item in a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingItem {
    /// Item kind; `"dir"` marks a directory.
    pub kind: Option<String>,
    /// Item name within its parent.
    pub name: Option<String>,
}

impl ListingItem {
    /// Decode one listing element leniently.
    ///
    /// Non-object elements and non-string `type` values yield an item that
    /// is never a directory; numeric names are stringified.
    pub fn from_value(value: &Value) -> Self {
        let kind = value.get("type").and_then(Value::as_str).map(str::to_string);
        let name = match value.get("name") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        ListingItem { kind, name }
    }

    /// A directory item.
    pub fn dir(name: &str) -> Self {
        ListingItem {
            kind: Some("dir".to_string()),
            name: Some(name.to_string()),
        }
    }

    /// A plain file item.
    pub fn file(name: &str) -> Self {
        ListingItem {
            kind: Some("file".to_string()),
            name: Some(name.to_string()),
        }
    }

    /// The item's name if it is a named directory.
    pub fn dir_name(&self) -> Option<&str> {
        match (self.kind.as_deref(), self.name.as_deref()) {
            (Some("dir"), Some(name)) => Some(name),
            _ => None,
        }
    }
}

/// Source of directory listings.
pub trait DirectoryListing {
    /// List the root directory.
    fn list_root(&self) -> Result<Vec<ListingItem>>;

    /// List a top-level directory by name.
    fn list_dir(&self, name: &str) -> Result<Vec<ListingItem>>;
}

/// Blocking HTTP client for a listing API.
#[derive(Debug, Clone)]
pub struct HttpListing {
    base_url: String,
    client: Client,
}

impl HttpListing {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// A trailing `/` on the base URL is ignored.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| RegistryError::Http {
                url: base_url.clone(),
                source,
            })?;
        Ok(HttpListing { base_url, client })
    }

    /// The normalized base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, url: String) -> Result<Vec<ListingItem>> {
        debug!(%url, "listing");
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|source| RegistryError::Http {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().map_err(|e| RegistryError::InvalidListing {
            url: url.clone(),
            detail: e.to_string(),
        })?;
        parse_listing(&url, &body)
    }
}

/// Decode a listing body, which must be a JSON array.
fn parse_listing(url: &str, body: &Value) -> Result<Vec<ListingItem>> {
    match body {
        Value::Array(items) => Ok(items.iter().map(ListingItem::from_value).collect()),
        _ => Err(RegistryError::InvalidListing {
            url: url.to_string(),
            detail: "expected a JSON array".to_string(),
        }),
    }
}

impl DirectoryListing for HttpListing {
    fn list_root(&self) -> Result<Vec<ListingItem>> {
        self.get(format!("{}/.", self.base_url))
    }

    fn list_dir(&self, name: &str) -> Result<Vec<ListingItem>> {
        self.get(format!("{}/{}", self.base_url, urlencoding::encode(name)))
    }
}

/// Collect every `top/sub` directory path two levels below the root.
///
/// A failing root listing is returned as an error. A failing top-level
/// directory is logged and skipped, keeping the other directories' results.
pub fn fetch_structure(listing: &dyn DirectoryListing) -> Result<BTreeSet<String>> {
    let root = listing.list_root()?;
    let mut paths = BTreeSet::new();

    for top in root.iter().filter_map(ListingItem::dir_name) {
        let children = match listing.list_dir(top) {
            Ok(children) => children,
            Err(e) => {
                warn!(dir = %top, error = %e, "skipping directory");
                continue;
            }
        };
        for sub in children.iter().filter_map(ListingItem::dir_name) {
            paths.insert(format!("{top}/{sub}"));
        }
    }

    debug!(count = paths.len(), "fetched directory structure");
    Ok(paths)
}
