//! Raster format capability table.
//!
//! Every format-dependent decision (decode, encode, alpha handling,
//! extension mapping) dispatches through this one table instead of
//! repeating MIME switches across resize/thumbnail/rotate call sites.

/// Formats the codec can decode and encode. HEIC/HEIF never appear here:
/// they are transcoded to JPEG before reaching the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoFormat {
    Jpeg,
    Png,
    Gif,
    WebP,
}

impl PhotoFormat {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.to_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(PhotoFormat::Jpeg),
            "image/png" => Some(PhotoFormat::Png),
            "image/gif" => Some(PhotoFormat::Gif),
            "image/webp" => Some(PhotoFormat::WebP),
            _ => None,
        }
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(PhotoFormat::Jpeg),
            "png" => Some(PhotoFormat::Png),
            "gif" => Some(PhotoFormat::Gif),
            "webp" => Some(PhotoFormat::WebP),
            _ => None,
        }
    }

    /// Identify the format from magic bytes.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        infer::get(data).and_then(|kind| Self::from_mime(kind.mime_type()))
    }

    pub fn mime(self) -> &'static str {
        match self {
            PhotoFormat::Jpeg => "image/jpeg",
            PhotoFormat::Png => "image/png",
            PhotoFormat::Gif => "image/gif",
            PhotoFormat::WebP => "image/webp",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            PhotoFormat::Jpeg => "jpg",
            PhotoFormat::Png => "png",
            PhotoFormat::Gif => "gif",
            PhotoFormat::WebP => "webp",
        }
    }

    pub fn to_image_format(self) -> image::ImageFormat {
        match self {
            PhotoFormat::Jpeg => image::ImageFormat::Jpeg,
            PhotoFormat::Png => image::ImageFormat::Png,
            PhotoFormat::Gif => image::ImageFormat::Gif,
            PhotoFormat::WebP => image::ImageFormat::WebP,
        }
    }

    /// Formats whose transparency must survive resampling.
    pub fn preserves_alpha(self) -> bool {
        !matches!(self, PhotoFormat::Jpeg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mime() {
        assert_eq!(PhotoFormat::from_mime("image/jpeg"), Some(PhotoFormat::Jpeg));
        assert_eq!(PhotoFormat::from_mime("IMAGE/PNG"), Some(PhotoFormat::Png));
        assert_eq!(PhotoFormat::from_mime("image/heic"), None);
        assert_eq!(PhotoFormat::from_mime("application/pdf"), None);
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(PhotoFormat::from_extension("JPG"), Some(PhotoFormat::Jpeg));
        assert_eq!(PhotoFormat::from_extension("jpeg"), Some(PhotoFormat::Jpeg));
        assert_eq!(PhotoFormat::from_extension("heic"), None);
    }

    #[test]
    fn test_sniff_png_magic() {
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([1, 2, 3]));
        let mut buffer = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut buffer),
            image::ImageFormat::Png,
        )
        .unwrap();

        assert_eq!(PhotoFormat::sniff(&buffer), Some(PhotoFormat::Png));
        assert_eq!(PhotoFormat::sniff(b"not an image"), None);
    }

    #[test]
    fn test_alpha_capability() {
        assert!(!PhotoFormat::Jpeg.preserves_alpha());
        assert!(PhotoFormat::Png.preserves_alpha());
        assert!(PhotoFormat::Gif.preserves_alpha());
        assert!(PhotoFormat::WebP.preserves_alpha());
    }
}
