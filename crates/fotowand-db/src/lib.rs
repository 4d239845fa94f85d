//! Postgres repositories for events and photos.
//!
//! The schema itself is owned by the admin/migration layer; these
//! repositories only encode the queries the pipeline and the ops tooling
//! need. The `photos` table carries a unique constraint on
//! `(event_id, file_hash)` — the pipeline's duplicate check is a
//! fast path, the constraint is the correctness backstop under
//! concurrent uploads.

pub mod events;
pub mod index;
pub mod photos;

pub use events::EventRepository;
pub use index::PhotoIndex;
pub use photos::PhotoRepository;
