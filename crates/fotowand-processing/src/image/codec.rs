//! Format-aware decode and encode.

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use std::io::Cursor;
use thiserror::Error;

use super::format::PhotoFormat;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Decode failed: {0}")]
    Decode(String),

    #[error("Encode failed: {0}")]
    Encode(String),

    #[error("Invalid rotation angle: {0} (allowed: 90, 180, 270)")]
    InvalidAngle(u16),
}

pub struct ImageCodec;

impl ImageCodec {
    /// Resolve a MIME type against the capability table.
    pub fn format_for_mime(mime: &str) -> Result<PhotoFormat, CodecError> {
        PhotoFormat::from_mime(mime).ok_or_else(|| CodecError::UnsupportedFormat(mime.to_string()))
    }

    /// Decode raster bytes known to be in `format`.
    pub fn decode(data: &[u8], format: PhotoFormat) -> Result<DynamicImage, CodecError> {
        image::load_from_memory_with_format(data, format.to_image_format())
            .map_err(|e| CodecError::Decode(e.to_string()))
    }

    /// Encode an image as `format`. `quality` applies to JPEG only; the
    /// other formats encode at their codec defaults.
    pub fn encode(
        img: &DynamicImage,
        format: PhotoFormat,
        quality: u8,
    ) -> Result<Vec<u8>, CodecError> {
        let mut buffer = Vec::new();
        match format {
            PhotoFormat::Jpeg => {
                // JPEG has no alpha channel
                let rgb = img.to_rgb8();
                JpegEncoder::new_with_quality(&mut Cursor::new(&mut buffer), quality)
                    .encode_image(&rgb)
                    .map_err(|e| CodecError::Encode(e.to_string()))?;
            }
            other => {
                img.write_to(&mut Cursor::new(&mut buffer), other.to_image_format())
                    .map_err(|e| CodecError::Encode(e.to_string()))?;
            }
        }
        Ok(buffer)
    }
}
