//! Persistence seam consumed by the intake pipeline.

use async_trait::async_trait;
use fotowand_core::{AppError, Photo};
use uuid::Uuid;

/// The two persistence operations the pipeline needs: the per-event
/// duplicate lookup and the final insert. Backed by [`PhotoRepository`]
/// in production; tests substitute an in-memory index.
///
/// [`PhotoRepository`]: crate::PhotoRepository
#[async_trait]
pub trait PhotoIndex: Send + Sync {
    /// True iff any photo in the event — active or inactive — already
    /// carries this content hash.
    async fn hash_exists(&self, event_id: Uuid, file_hash: &str) -> Result<bool, AppError>;

    /// Insert the finished photo record. A unique-constraint conflict on
    /// `(event_id, file_hash)` must surface as [`AppError::Duplicate`].
    async fn insert(&self, photo: &Photo) -> Result<(), AppError>;
}
