//! Stored photo record and the intake result payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted photo, shaped by the intake pipeline.
///
/// `distance_meters` is nullable and null means "not computed" — distinct
/// from a computed distance of zero. After insertion the record is only
/// ever mutated by a moderation flip of `is_active`; rotation rewrites
/// the image files in place and leaves the record untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    pub id: Uuid,
    pub event_id: Uuid,
    /// Stored filename, unique within the event's photo directory
    pub filename: String,
    pub original_filename: String,
    pub username: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub distance_meters: Option<f64>,
    pub file_size: i64,
    pub content_type: String,
    /// SHA-256 of the upload bytes, hex encoded; dedup key within the event
    pub file_hash: String,
    pub resized_filename: Option<String>,
    pub thumbnail_filename: Option<String>,
    /// Gates visibility in gallery/display/API responses
    pub is_active: bool,
    pub uploaded_at: DateTime<Utc>,
}

/// GPS position included in upload responses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Structured intake result handed back to the HTTP boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    pub photo_id: Uuid,
    pub filename: String,
    pub moderation_required: bool,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_distance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_serializes_camel_case() {
        let receipt = UploadReceipt {
            photo_id: Uuid::new_v4(),
            filename: "abc_1700000000.jpg".to_string(),
            moderation_required: false,
            is_active: true,
            distance: Some(7.42),
            formatted_distance: Some("7 m".to_string()),
            location: Some(GeoPoint {
                latitude: 52.52,
                longitude: 13.405,
            }),
        };

        let json = serde_json::to_string(&receipt).unwrap();
        assert!(json.contains("\"photoId\""));
        assert!(json.contains("\"isActive\":true"));
        assert!(json.contains("\"formattedDistance\":\"7 m\""));
    }

    #[test]
    fn test_receipt_omits_absent_gps_fields() {
        let receipt = UploadReceipt {
            photo_id: Uuid::new_v4(),
            filename: "abc_1700000000.jpg".to_string(),
            moderation_required: true,
            is_active: false,
            distance: None,
            formatted_distance: None,
            location: None,
        };

        let json = serde_json::to_string(&receipt).unwrap();
        assert!(!json.contains("distance"));
        assert!(!json.contains("location"));
    }

    #[test]
    fn test_photo_round_trips_through_json() {
        let photo = Photo {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            filename: "token_1700000000.jpg".to_string(),
            original_filename: "IMG_0001.jpg".to_string(),
            username: Some("ada".to_string()),
            latitude: Some(52.52),
            longitude: Some(13.405),
            distance_meters: Some(0.0),
            file_size: 123_456,
            content_type: "image/jpeg".to_string(),
            file_hash: "ab".repeat(32),
            resized_filename: Some("resized_token_1700000000.jpg".to_string()),
            thumbnail_filename: None,
            is_active: false,
            uploaded_at: Utc::now(),
        };

        let json = serde_json::to_string(&photo).unwrap();
        let back: Photo = serde_json::from_str(&json).unwrap();
        assert_eq!(back.file_hash, photo.file_hash);
        // Computed-zero distance survives, it is not collapsed to null
        assert_eq!(back.distance_meters, Some(0.0));
    }
}
