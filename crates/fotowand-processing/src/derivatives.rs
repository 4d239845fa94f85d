//! Derivative generation: display-size resize and thumbnail.
//!
//! Both derivatives fail soft. A failed resize leaves the original
//! serving as the display image; a failed thumbnail leaves the photo
//! without one and viewers fall back to the full image. Neither failure
//! aborts an upload.

use fotowand_core::ProcessingConfig;

use crate::image::{resize_to_fit, CodecError, ImageCodec, PhotoFormat};

/// Generated derivative bytes; `None` marks a soft failure.
#[derive(Debug, Default)]
pub struct DerivativeSet {
    /// Display derivative, same format as the source
    pub resized: Option<Vec<u8>>,
    /// Thumbnail, always JPEG
    pub thumbnail: Option<Vec<u8>>,
}

impl DerivativeSet {
    pub fn resize_ok(&self) -> bool {
        self.resized.is_some()
    }

    pub fn thumb_ok(&self) -> bool {
        self.thumbnail.is_some()
    }
}

/// Builds display and thumbnail derivatives from a canonical source image.
#[derive(Clone)]
pub struct DerivativeGenerator {
    config: ProcessingConfig,
}

impl DerivativeGenerator {
    pub fn new(config: ProcessingConfig) -> Self {
        Self { config }
    }

    /// Generate both derivatives from the stored original.
    pub fn generate(&self, data: &[u8], format: PhotoFormat) -> DerivativeSet {
        DerivativeSet {
            resized: self.try_resized(data, format),
            thumbnail: self.try_thumbnail(data, format),
        }
    }

    /// Rotation path: rebuild only derivatives that already exist, so a
    /// rotation never invents new files.
    pub fn regenerate_from_original(
        &self,
        data: &[u8],
        format: PhotoFormat,
        has_resized: bool,
        has_thumbnail: bool,
    ) -> DerivativeSet {
        DerivativeSet {
            resized: if has_resized {
                self.try_resized(data, format)
            } else {
                None
            },
            thumbnail: if has_thumbnail {
                self.try_thumbnail(data, format)
            } else {
                None
            },
        }
    }

    fn try_resized(&self, data: &[u8], format: PhotoFormat) -> Option<Vec<u8>> {
        match self.build_resized(data, format) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::warn!(error = %e, "Display resize failed, original will serve as display image");
                None
            }
        }
    }

    fn try_thumbnail(&self, data: &[u8], format: PhotoFormat) -> Option<Vec<u8>> {
        match self.build_thumbnail(data, format) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::warn!(error = %e, "Thumbnail generation failed");
                None
            }
        }
    }

    fn build_resized(&self, data: &[u8], format: PhotoFormat) -> Result<Vec<u8>, CodecError> {
        let img = ImageCodec::decode(data, format)?;
        let resized = resize_to_fit(
            &img,
            format,
            self.config.display_max_width,
            self.config.display_max_height,
        );
        ImageCodec::encode(&resized, format, self.config.display_quality)
    }

    /// Thumbnails re-encode as JPEG regardless of source format so every
    /// viewer gets a small, universally renderable file.
    fn build_thumbnail(&self, data: &[u8], format: PhotoFormat) -> Result<Vec<u8>, CodecError> {
        let img = ImageCodec::decode(data, format)?;
        let thumb = resize_to_fit(
            &img,
            format,
            self.config.thumbnail_max_width,
            self.config.thumbnail_max_height,
        );
        ImageCodec::encode(&thumb, PhotoFormat::Jpeg, self.config.thumbnail_quality)
    }
}
