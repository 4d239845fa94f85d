//! Exact-duplicate detection via content hashing.
//!
//! The hash is computed over the upload bytes as received — before any
//! HEIC conversion or rotation — so re-uploading the same source file
//! always dedupes, independent of converter behavior.

use fotowand_core::AppError;
use fotowand_db::PhotoIndex;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

/// Hex-encoded SHA-256 of the file bytes.
pub fn content_hash(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Per-event duplicate check against the photo index.
#[derive(Clone)]
pub struct DuplicateDetector {
    index: Arc<dyn PhotoIndex>,
}

impl DuplicateDetector {
    pub fn new(index: Arc<dyn PhotoIndex>) -> Self {
        Self { index }
    }

    /// True iff the event already holds a photo with this hash, active or
    /// not. A fast path only: the storage layer's unique constraint is
    /// the backstop under concurrent uploads.
    pub async fn is_duplicate(&self, event_id: Uuid, file_hash: &str) -> Result<bool, AppError> {
        self.index.hash_exists(event_id, file_hash).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_idempotent() {
        let data = b"same bytes";
        assert_eq!(content_hash(data), content_hash(data));
    }

    #[test]
    fn test_hash_is_64_hex_chars() {
        let hash = content_hash(b"anything");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_single_byte_flip_changes_hash() {
        let a = vec![0u8; 1024];
        let mut b = a.clone();
        b[512] ^= 1;
        assert_ne!(content_hash(&a), content_hash(&b));
    }

    #[test]
    fn test_known_vector() {
        // SHA-256 of the empty input
        assert_eq!(
            content_hash(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
