//! Event configuration model.
//!
//! An event is the photo-collection context: it owns the GPS fence, the
//! moderation policy and the upload limits. The record itself is managed
//! by the admin CRUD layer; the pipeline consumes it read-only.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Upload size limit, restricted to a fixed set of allowed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MaxUploadSize {
    #[serde(rename = "2m")]
    Mib2,
    #[serde(rename = "5m")]
    Mib5,
    #[default]
    #[serde(rename = "10m")]
    Mib10,
    #[serde(rename = "20m")]
    Mib20,
    #[serde(rename = "50m")]
    Mib50,
}

impl MaxUploadSize {
    pub const fn bytes(self) -> u64 {
        let mib = match self {
            MaxUploadSize::Mib2 => 2,
            MaxUploadSize::Mib5 => 5,
            MaxUploadSize::Mib10 => 10,
            MaxUploadSize::Mib20 => 20,
            MaxUploadSize::Mib50 => 50,
        };
        mib * 1024 * 1024
    }

    /// Map a persisted byte count back onto the enumerated set.
    /// Unknown values fall back to the default limit.
    pub fn from_bytes(bytes: i64) -> Self {
        [
            MaxUploadSize::Mib2,
            MaxUploadSize::Mib5,
            MaxUploadSize::Mib10,
            MaxUploadSize::Mib20,
            MaxUploadSize::Mib50,
        ]
        .into_iter()
        .find(|s| s.bytes() as i64 == bytes)
        .unwrap_or_default()
    }
}

/// Read-only event settings consumed by the intake pipeline.
///
/// When `gps_validation_required` is set but no center is configured,
/// distance checking is disabled; the pipeline must not fail on the
/// missing center.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EventConfig {
    pub id: Uuid,
    #[validate(length(min = 1, max = 64))]
    pub slug: String,
    pub name: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub center_latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub center_longitude: Option<f64>,
    /// Geofence radius in meters
    #[validate(range(min = 10, max = 10_000))]
    pub radius_meters: u32,
    pub gps_validation_required: bool,
    pub moderation_required: bool,
    pub max_upload_size: MaxUploadSize,
    pub upload_enabled: bool,
    pub is_active: bool,
}

impl EventConfig {
    /// Configured fence center, present only when both coordinates are set.
    pub fn center(&self) -> Option<(f64, f64)> {
        self.center_latitude.zip(self.center_longitude)
    }
}
