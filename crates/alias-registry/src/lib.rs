//! Alias registry maintenance.
//!
//! Keeps a JSON registry (`alias.json`) that maps two-level directory paths
//! from a remote listing API to stable identifiers and user-edited alias
//! lists. Handles loading every historical registry shape, migrating legacy
//! identifiers, reconciling against a fresh listing, and writing the
//! normalized version 3 document.
//!
//! # Architecture
//!
//! A run is a single sequential pass:
//! - **Load** — [`load_registry`] normalizes the file into [`Entry`] values
//! - **Fetch** — [`fetch_structure`] walks a [`DirectoryListing`] two levels deep
//! - **Migrate** — [`migrate_ids`] assigns stable, collision-free IDs
//! - **Reconcile** — [`reconcile`] merges observed paths with known entries
//! - **Write** — [`save_registry`] emits the canonical document
//!
//! [`sync::run`] ties the steps together and reports an [`Outcome`].

pub mod entry;
pub mod error;
pub mod listing;
pub mod load;
pub mod migrate;
pub mod reconcile;
pub mod search;
pub mod slug;
pub mod store;
pub mod sync;

// Re-exports for convenience.
pub use entry::{Entry, SchemaVersion, CURRENT_VERSION};
pub use error::{RegistryError, Result};
pub use listing::{fetch_structure, DirectoryListing, HttpListing, ListingItem, DEFAULT_TIMEOUT};
pub use load::{load_registry, LoadOutcome};
pub use migrate::{migrate_ids, needs_id_upgrade};
pub use reconcile::reconcile;
pub use search::search;
pub use slug::{slugify, ClaimedIds};
pub use store::save_registry;
pub use sync::{Mode, Outcome, SyncOptions, WriteAction};
