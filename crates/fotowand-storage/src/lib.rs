//! Event-keyed local filesystem tree.
//!
//! Every event slug owns three subdirectories — `photos/`, `thumbnails/`
//! and `logos/` — created on demand. Stored filenames are generated
//! collision-free (random token + timestamp), so concurrent uploads never
//! target the same path and no locking is needed.

pub mod naming;
mod store;

pub use store::{EventStore, MediaDir, StorageError, StorageResult};
