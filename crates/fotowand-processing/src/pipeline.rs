//! The photo intake pipeline.
//!
//! One uploaded file plus the event configuration in; a persisted photo
//! record plus an activation decision out. Stages run in a fixed order —
//! `Received → HashChecked → Converted → Rotated → GeoExtracted →
//! GeoValidated → DerivativesBuilt → Persisted` — and every hard failure
//! aborts with the temp file cleaned up. Soft failures (orientation
//! rewrite, resize, thumbnail, missing GPS) degrade the stored record
//! instead of failing the request.

use chrono::Utc;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use fotowand_core::{
    AppError, ConverterConfig, EventConfig, GeoPoint, Photo, ProcessingConfig, UploadReceipt,
    UploadedFile,
};
use fotowand_db::PhotoIndex;
use fotowand_geo::{extract_gps, format_distance, haversine_distance, GpsExtraction};
use fotowand_storage::{naming, EventStore, MediaDir};

use crate::convert::HeicConverter;
use crate::dedup::{content_hash, DuplicateDetector};
use crate::derivatives::DerivativeGenerator;
use crate::image::{ImageOrientation, PhotoFormat};
use crate::validator::UploadValidator;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IntakeStage {
    Received,
    HashChecked,
    Converted,
    Rotated,
    GeoExtracted,
    GeoValidated,
    DerivativesBuilt,
    Persisted,
}

impl fmt::Display for IntakeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntakeStage::Received => "received",
            IntakeStage::HashChecked => "hash_checked",
            IntakeStage::Converted => "converted",
            IntakeStage::Rotated => "rotated",
            IntakeStage::GeoExtracted => "geo_extracted",
            IntakeStage::GeoValidated => "geo_validated",
            IntakeStage::DerivativesBuilt => "derivatives_built",
            IntakeStage::Persisted => "persisted",
        };
        f.write_str(name)
    }
}

/// Activation rule: a photo is immediately visible unless the event
/// moderates uploads or required GPS validation did not pass.
fn compute_activation(moderation_required: bool, gps_validation_failed: bool) -> bool {
    !(moderation_required || gps_validation_failed)
}

/// Round a distance to two decimals for persistence.
fn round_distance(meters: f64) -> f64 {
    (meters * 100.0).round() / 100.0
}

/// Orchestrates intake of one uploaded photo.
pub struct IntakePipeline {
    store: EventStore,
    index: Arc<dyn PhotoIndex>,
    detector: DuplicateDetector,
    converter: HeicConverter,
    derivatives: DerivativeGenerator,
    rotate_quality: u8,
}

impl IntakePipeline {
    pub fn new(
        store: EventStore,
        index: Arc<dyn PhotoIndex>,
        processing: ProcessingConfig,
        converter: ConverterConfig,
    ) -> Self {
        Self {
            store,
            detector: DuplicateDetector::new(index.clone()),
            index,
            converter: HeicConverter::new(converter),
            rotate_quality: processing.rotate_quality,
            derivatives: DerivativeGenerator::new(processing),
        }
    }

    /// Run the full intake for one upload.
    ///
    /// The upload is consumed; on any hard failure nothing remains on
    /// disk and no record is persisted. `username` is an opaque,
    /// caller-sanitized request parameter.
    pub async fn ingest(
        &self,
        event: &EventConfig,
        upload: UploadedFile,
        username: Option<String>,
    ) -> Result<UploadReceipt, AppError> {
        // Received: everything rejectable before touching the disk
        UploadValidator::validate(&upload, event)?;
        self.stage(event, IntakeStage::Received);

        // HashChecked: temp write under the final collision-free name,
        // then the duplicate fast path. The hash covers the bytes as
        // received so dedup is independent of conversion.
        let file_hash = content_hash(&upload.data);
        let mut stored_name = naming::stored_photo_name(&upload.original_filename);

        self.store
            .ensure_event_dirs(&event.slug)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;
        self.store
            .write(&event.slug, MediaDir::Photos, &stored_name, &upload.data)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        let duplicate = match self.detector.is_duplicate(event.id, &file_hash).await {
            Ok(duplicate) => duplicate,
            Err(e) => {
                self.store
                    .delete_photo_files(&event.slug, &stored_name, None, None)
                    .await;
                return Err(e);
            }
        };
        if duplicate {
            self.store
                .delete_photo_files(&event.slug, &stored_name, None, None)
                .await;
            return Err(AppError::Duplicate);
        }
        self.stage(event, IntakeStage::HashChecked);

        let extension = upload.extension();
        let UploadedFile {
            original_filename,
            declared_mime,
            mut data,
            ..
        } = upload;

        // Converted: HEIC/HEIF becomes a high-quality JPEG or the upload
        // dies here. No placeholder is ever substituted.
        let was_converted = HeicConverter::needs_conversion(&declared_mime, &original_filename);
        if was_converted {
            let jpeg = match self.converter.convert_to_jpeg(&data).await {
                Ok(jpeg) => jpeg,
                Err(e) => {
                    self.store
                        .delete_photo_files(&event.slug, &stored_name, None, None)
                        .await;
                    return Err(e);
                }
            };

            let jpeg_name = naming::with_extension(&stored_name, "jpg");
            if let Err(e) = self
                .store
                .write(&event.slug, MediaDir::Photos, &jpeg_name, &jpeg)
                .await
            {
                self.store
                    .delete_photo_files(&event.slug, &stored_name, None, None)
                    .await;
                return Err(AppError::Storage(e.to_string()));
            }
            if jpeg_name != stored_name {
                self.store
                    .delete_photo_files(&event.slug, &stored_name, None, None)
                    .await;
            }
            stored_name = jpeg_name;
            data = jpeg;
        }
        self.stage(event, IntakeStage::Converted);

        let format = if was_converted {
            Some(PhotoFormat::Jpeg)
        } else {
            PhotoFormat::sniff(&data)
                .or_else(|| PhotoFormat::from_mime(&declared_mime))
                .or_else(|| extension.as_deref().and_then(PhotoFormat::from_extension))
        };
        let content_type = format
            .map(|f| f.mime().to_string())
            .unwrap_or_else(|| declared_mime.clone());

        // Rotated: upright the image per its EXIF tag. Converted files
        // were already oriented by the converter. Failure is soft.
        // The rewrite re-encodes and drops EXIF, so the GPS stage reads
        // from the pre-rotation bytes.
        let mut geo_source: Option<Vec<u8>> = None;
        if !was_converted {
            if let Some(fmt) = format {
                if ImageOrientation::read_orientation_tag(&data) != 1 {
                    geo_source = Some(data.clone());
                    if let Some(rotated) = self.auto_orient(&data, fmt).await {
                        match self
                            .store
                            .write(&event.slug, MediaDir::Photos, &stored_name, &rotated)
                            .await
                        {
                            Ok(_) => data = rotated,
                            Err(e) => tracing::warn!(
                                error = %e,
                                "Failed to rewrite auto-rotated original, keeping unrotated file"
                            ),
                        }
                    }
                }
            }
        }
        self.stage(event, IntakeStage::Rotated);

        // GeoExtracted: absence of GPS is not an error here
        let gps = extract_gps(geo_source.as_deref().unwrap_or(&data));
        self.stage(event, IntakeStage::GeoExtracted);

        // GeoValidated: the geofence is the only geo check that hard-rejects
        let mut gps_validation_failed = false;
        let mut location: Option<GeoPoint> = None;
        let mut distance_meters: Option<f64> = None;

        match gps {
            GpsExtraction::Found {
                latitude,
                longitude,
            } => {
                location = Some(GeoPoint {
                    latitude,
                    longitude,
                });
                if let Some((center_lat, center_lon)) = event.center() {
                    let distance = haversine_distance(latitude, longitude, center_lat, center_lon);
                    distance_meters = Some(round_distance(distance));

                    if event.gps_validation_required && distance > event.radius_meters as f64 {
                        self.store
                            .delete_photo_files(&event.slug, &stored_name, None, None)
                            .await;
                        return Err(AppError::GeofenceExceeded {
                            distance: format_distance(Some(distance)),
                            max: format_distance(Some(event.radius_meters as f64)),
                        });
                    }
                }
            }
            GpsExtraction::NotFound | GpsExtraction::Malformed => {
                // "Accept but hold for moderation": missing or unusable
                // GPS never rejects the upload outright
                if event.gps_validation_required {
                    gps_validation_failed = true;
                    tracing::info!(
                        event = %event.slug,
                        "Upload has no usable GPS, photo will be held for moderation"
                    );
                }
            }
        }
        self.stage(event, IntakeStage::GeoValidated);

        // DerivativesBuilt: both derivatives fail soft
        let mut resized_filename = None;
        let mut thumbnail_filename = None;
        if let Some(fmt) = format {
            let generator = self.derivatives.clone();
            let input = data.clone();
            let set = match tokio::task::spawn_blocking(move || generator.generate(&input, fmt))
                .await
            {
                Ok(set) => set,
                Err(e) => {
                    tracing::warn!(error = %e, "Derivative generation task failed");
                    Default::default()
                }
            };

            if let Some(bytes) = set.resized {
                let name = naming::resized_name(&stored_name);
                match self
                    .store
                    .write(&event.slug, MediaDir::Photos, &name, &bytes)
                    .await
                {
                    Ok(_) => resized_filename = Some(name),
                    Err(e) => tracing::warn!(error = %e, "Failed to write display derivative"),
                }
            }
            if let Some(bytes) = set.thumbnail {
                let name = naming::thumbnail_name(&stored_name);
                match self
                    .store
                    .write(&event.slug, MediaDir::Thumbnails, &name, &bytes)
                    .await
                {
                    Ok(_) => thumbnail_filename = Some(name),
                    Err(e) => tracing::warn!(error = %e, "Failed to write thumbnail"),
                }
            }
        }
        self.stage(event, IntakeStage::DerivativesBuilt);

        // Persisted
        let is_active = compute_activation(event.moderation_required, gps_validation_failed);
        let photo = Photo {
            id: Uuid::new_v4(),
            event_id: event.id,
            filename: stored_name.clone(),
            original_filename,
            username,
            latitude: location.map(|l| l.latitude),
            longitude: location.map(|l| l.longitude),
            distance_meters,
            file_size: data.len() as i64,
            content_type,
            file_hash,
            resized_filename: resized_filename.clone(),
            thumbnail_filename: thumbnail_filename.clone(),
            is_active,
            uploaded_at: Utc::now(),
        };

        if let Err(e) = self.index.insert(&photo).await {
            // An orphaned file without a record is worse than a clean
            // failure: roll the written files back
            self.store
                .delete_photo_files(
                    &event.slug,
                    &stored_name,
                    resized_filename.as_deref(),
                    thumbnail_filename.as_deref(),
                )
                .await;
            return Err(e);
        }
        self.stage(event, IntakeStage::Persisted);

        tracing::info!(
            photo_id = %photo.id,
            event = %event.slug,
            filename = %photo.filename,
            is_active,
            distance = ?distance_meters,
            "Photo ingested"
        );

        Ok(UploadReceipt {
            photo_id: photo.id,
            filename: photo.filename,
            moderation_required: event.moderation_required,
            is_active,
            distance: distance_meters,
            formatted_distance: distance_meters.map(|d| format_distance(Some(d))),
            location,
        })
    }

    /// Run the EXIF upright rewrite off the async pool. Every failure
    /// mode is soft: the unrotated image proceeds.
    async fn auto_orient(&self, data: &[u8], format: PhotoFormat) -> Option<Vec<u8>> {
        let input = data.to_vec();
        let quality = self.rotate_quality;
        match tokio::task::spawn_blocking(move || {
            ImageOrientation::auto_orient(&input, format, quality)
        })
        .await
        {
            Ok(Ok(rotated)) => rotated,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "EXIF orientation correction failed, continuing unrotated");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Orientation task failed, continuing unrotated");
                None
            }
        }
    }

    fn stage(&self, event: &EventConfig, stage: IntakeStage) {
        tracing::debug!(event = %event.slug, stage = %stage, "Intake stage complete");
    }
}
