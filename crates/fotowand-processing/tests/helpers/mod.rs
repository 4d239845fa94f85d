//! Shared fixtures for the intake and rotation integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use fotowand_core::{
    AppError, ConverterConfig, EventConfig, MaxUploadSize, Photo, ProcessingConfig,
};
use fotowand_db::PhotoIndex;
use fotowand_processing::IntakePipeline;
use fotowand_storage::EventStore;

use little_exif::exif_tag::ExifTag;
use little_exif::filetype::FileExtension;
use little_exif::metadata::Metadata;
use little_exif::rational::uR64;

/// In-memory stand-in for the photo repository, including the unique
/// `(event_id, file_hash)` backstop.
#[derive(Default)]
pub struct MemoryPhotoIndex {
    photos: Mutex<Vec<Photo>>,
}

impl MemoryPhotoIndex {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn photos(&self) -> Vec<Photo> {
        self.photos.lock().unwrap().clone()
    }
}

#[async_trait]
impl PhotoIndex for MemoryPhotoIndex {
    async fn hash_exists(&self, event_id: Uuid, file_hash: &str) -> Result<bool, AppError> {
        Ok(self
            .photos
            .lock()
            .unwrap()
            .iter()
            .any(|p| p.event_id == event_id && p.file_hash == file_hash))
    }

    async fn insert(&self, photo: &Photo) -> Result<(), AppError> {
        let mut photos = self.photos.lock().unwrap();
        if photos
            .iter()
            .any(|p| p.event_id == photo.event_id && p.file_hash == photo.file_hash)
        {
            return Err(AppError::Duplicate);
        }
        photos.push(photo.clone());
        Ok(())
    }
}

/// Index whose insert always fails, for persistence-rollback tests.
pub struct FailingIndex;

#[async_trait]
impl PhotoIndex for FailingIndex {
    async fn hash_exists(&self, _event_id: Uuid, _file_hash: &str) -> Result<bool, AppError> {
        Ok(false)
    }

    async fn insert(&self, _photo: &Photo) -> Result<(), AppError> {
        Err(AppError::Persistence("injected insert failure".to_string()))
    }
}

pub fn base_event(slug: &str) -> EventConfig {
    EventConfig {
        id: Uuid::new_v4(),
        slug: slug.to_string(),
        name: slug.to_string(),
        center_latitude: None,
        center_longitude: None,
        radius_meters: 100,
        gps_validation_required: false,
        moderation_required: false,
        max_upload_size: MaxUploadSize::Mib10,
        upload_enabled: true,
        is_active: true,
    }
}

pub async fn make_store(root: &Path) -> EventStore {
    EventStore::new(root, "http://localhost:8080/events".to_string())
        .await
        .unwrap()
}

pub fn make_pipeline(store: EventStore, index: Arc<dyn PhotoIndex>) -> IntakePipeline {
    IntakePipeline::new(
        store,
        index,
        ProcessingConfig::default(),
        // Deterministic conversion failure: the tools must not resolve
        ConverterConfig {
            heif_convert_path: "/nonexistent/heif-convert".to_string(),
            ffmpeg_path: "/nonexistent/ffmpeg".to_string(),
            convert_quality: 92,
        },
    )
}

pub fn solid_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([140, 90, 40]));
    let mut buffer = Vec::new();
    img.write_to(
        &mut std::io::Cursor::new(&mut buffer),
        image::ImageFormat::Jpeg,
    )
    .unwrap();
    buffer
}

fn dms(value: f64) -> Vec<uR64> {
    let degrees = value.trunc();
    let minutes_full = (value - degrees) * 60.0;
    let minutes = minutes_full.trunc();
    let seconds = (minutes_full - minutes) * 60.0;
    vec![
        uR64 {
            nominator: degrees as u32,
            denominator: 1,
        },
        uR64 {
            nominator: minutes as u32,
            denominator: 1,
        },
        uR64 {
            nominator: (seconds * 10_000.0).round() as u32,
            denominator: 10_000,
        },
    ]
}

/// A JPEG carrying EXIF GPS for the given decimal coordinates.
pub fn jpeg_with_gps(latitude: f64, longitude: f64) -> Vec<u8> {
    let mut data = solid_jpeg(64, 48);

    let lat_ref = if latitude < 0.0 { "S" } else { "N" };
    let lon_ref = if longitude < 0.0 { "W" } else { "E" };

    let mut metadata = Metadata::new();
    metadata.set_tag(ExifTag::GPSLatitudeRef(lat_ref.to_string()));
    metadata.set_tag(ExifTag::GPSLatitude(dms(latitude.abs())));
    metadata.set_tag(ExifTag::GPSLongitudeRef(lon_ref.to_string()));
    metadata.set_tag(ExifTag::GPSLongitude(dms(longitude.abs())));
    metadata
        .write_to_vec(&mut data, FileExtension::JPEG)
        .unwrap();

    data
}

/// Count regular files in one event subdirectory.
pub fn files_in(root: &Path, slug: &str, sub: &str) -> usize {
    let dir = root.join(slug).join(sub);
    if !dir.is_dir() {
        return 0;
    }
    std::fs::read_dir(dir)
        .unwrap()
        .filter(|e| e.as_ref().unwrap().path().is_file())
        .count()
}
