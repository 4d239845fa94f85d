//! Stored filename generation.
//!
//! Originals are stored as `{token}_{unix_ts}.{ext}`; the display
//! derivative prefixes the stored name with `resized_` and the thumbnail
//! is always `thumb_{stem}.jpg` regardless of the source format.

use chrono::Utc;
use std::path::Path;
use uuid::Uuid;

/// Extension to fall back on when the original filename has none.
const DEFAULT_EXTENSION: &str = "jpg";

/// Lowercased extension of a filename, if any.
pub fn file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Collision-free stored name for a fresh upload, keeping the original's
/// extension.
pub fn stored_photo_name(original_filename: &str) -> String {
    let ext = file_extension(original_filename).unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
    format!(
        "{}_{}.{}",
        Uuid::new_v4().simple(),
        Utc::now().timestamp(),
        ext
    )
}

/// Swap the extension of a stored name (HEIC conversion renames the
/// stored file to `.jpg`).
pub fn with_extension(stored: &str, ext: &str) -> String {
    match stored.rsplit_once('.') {
        Some((stem, _)) => format!("{}.{}", stem, ext),
        None => format!("{}.{}", stored, ext),
    }
}

/// Name of the display derivative for a stored original.
pub fn resized_name(stored: &str) -> String {
    format!("resized_{}", stored)
}

/// Name of the thumbnail for a stored original; always a JPEG.
pub fn thumbnail_name(stored: &str) -> String {
    let stem = stored.rsplit_once('.').map(|(s, _)| s).unwrap_or(stored);
    format!("thumb_{}.jpg", stem)
}
