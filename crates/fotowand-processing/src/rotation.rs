//! Admin-triggered rotation of an already-stored photo.
//!
//! Rewrites the original in place at high quality and regenerates only
//! the derivatives that already exist — a rotation never invents new
//! files. The photo record itself (including activation) is untouched.

use serde::Serialize;

use fotowand_core::{AppError, Photo, ProcessingConfig};
use fotowand_storage::{EventStore, MediaDir, StorageError};

use crate::derivatives::DerivativeGenerator;
use crate::image::{CodecError, ImageCodec, ImageOrientation, PhotoFormat};

/// Per-artifact result map so callers can report partial outcomes
/// ("original rotated; thumbnail regeneration failed").
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationOutcome {
    pub original: bool,
    pub resized: bool,
    pub thumbnail: bool,
}

pub struct RotationService {
    store: EventStore,
    derivatives: DerivativeGenerator,
    rotate_quality: u8,
}

impl RotationService {
    pub fn new(store: EventStore, processing: ProcessingConfig) -> Self {
        Self {
            store,
            rotate_quality: processing.rotate_quality,
            derivatives: DerivativeGenerator::new(processing),
        }
    }

    /// Rotate the stored original by 90, 180 or 270 degrees clockwise.
    ///
    /// The original file must exist; anything else about the derivative
    /// regeneration is reported per artifact instead of failing the call.
    pub async fn rotate(
        &self,
        event_slug: &str,
        photo: &Photo,
        angle: u16,
    ) -> Result<RotationOutcome, AppError> {
        if !matches!(angle, 90 | 180 | 270) {
            return Err(AppError::Validation(format!(
                "Invalid rotation angle: {} (allowed: 90, 180, 270)",
                angle
            )));
        }

        let data = self
            .store
            .read(event_slug, MediaDir::Photos, &photo.filename)
            .await
            .map_err(|e| match e {
                StorageError::NotFound(_) => {
                    AppError::NotFound(format!("Original file {} is missing", photo.filename))
                }
                other => AppError::Storage(other.to_string()),
            })?;

        let format = match PhotoFormat::sniff(&data) {
            Some(format) => format,
            None => ImageCodec::format_for_mime(&photo.content_type)
                .map_err(|e| AppError::ImageProcessing(e.to_string()))?,
        };

        // One-shot corrective action on the canonical asset: re-encode at
        // high quality, not the routine resize quality
        let quality = self.rotate_quality;
        let input = data.clone();
        let rotated = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, CodecError> {
            let img = ImageCodec::decode(&input, format)?;
            let img = ImageOrientation::rotate_by_angle(img, angle)?;
            ImageCodec::encode(&img, format, quality)
        })
        .await
        .map_err(|e| AppError::Internal(format!("Rotation task failed: {}", e)))?
        .map_err(|e| AppError::ImageProcessing(e.to_string()))?;

        self.store
            .write(event_slug, MediaDir::Photos, &photo.filename, &rotated)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        // Regenerate only derivatives that are actually on disk
        let has_resized = match photo.resized_filename.as_deref() {
            Some(name) => self
                .store
                .exists(event_slug, MediaDir::Photos, name)
                .await
                .unwrap_or(false),
            None => false,
        };
        let has_thumbnail = match photo.thumbnail_filename.as_deref() {
            Some(name) => self
                .store
                .exists(event_slug, MediaDir::Thumbnails, name)
                .await
                .unwrap_or(false),
            None => false,
        };

        let generator = self.derivatives.clone();
        let input = rotated.clone();
        let set = tokio::task::spawn_blocking(move || {
            generator.regenerate_from_original(&input, format, has_resized, has_thumbnail)
        })
        .await
        .map_err(|e| AppError::Internal(format!("Derivative task failed: {}", e)))?;

        let mut outcome = RotationOutcome {
            original: true,
            resized: false,
            thumbnail: false,
        };

        if let (Some(name), Some(bytes)) = (photo.resized_filename.as_deref(), set.resized) {
            match self
                .store
                .write(event_slug, MediaDir::Photos, name, &bytes)
                .await
            {
                Ok(_) => outcome.resized = true,
                Err(e) => tracing::warn!(error = %e, "Failed to rewrite display derivative"),
            }
        }
        if let (Some(name), Some(bytes)) = (photo.thumbnail_filename.as_deref(), set.thumbnail) {
            match self
                .store
                .write(event_slug, MediaDir::Thumbnails, name, &bytes)
                .await
            {
                Ok(_) => outcome.thumbnail = true,
                Err(e) => tracing::warn!(error = %e, "Failed to rewrite thumbnail"),
            }
        }

        tracing::info!(
            photo_id = %photo.id,
            event = %event_slug,
            angle,
            resized = outcome.resized,
            thumbnail = outcome.thumbnail,
            "Photo rotated"
        );

        Ok(outcome)
    }
}
