//! EXIF orientation handling (automatic correction and manual rotation).

use exif::{In, Reader, Tag};
use image::{imageops, DynamicImage};
use std::io::Cursor;

use super::codec::{CodecError, ImageCodec};
use super::format::PhotoFormat;

/// Image orientation operations (rotation and flipping)
pub struct ImageOrientation;

impl ImageOrientation {
    /// Read the EXIF `Orientation` tag from image data.
    ///
    /// Returns the tag value (1-8), or 1 (normal) when the tag or the
    /// whole EXIF block is absent.
    pub fn read_orientation_tag(data: &[u8]) -> u8 {
        let exif = match Reader::new().read_from_container(&mut Cursor::new(data)) {
            Ok(exif) => exif,
            Err(_) => return 1,
        };

        exif.get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(|v| v as u8)
            .unwrap_or(1)
    }

    /// Rotation and flip needed to upright a given EXIF orientation.
    /// Returns (rotate_angle_cw, flip_horizontal, flip_vertical); the
    /// rotation applies before the flip.
    pub fn orientation_transforms(orientation: u8) -> (Option<u16>, bool, bool) {
        match orientation {
            2 => (None, true, false),       // Mirror horizontal
            3 => (Some(180), false, false), // Rotate 180
            4 => (None, false, true),       // Mirror vertical
            5 => (Some(90), true, false),   // Rotate 90 CW + mirror horizontal (transpose)
            6 => (Some(90), false, false),  // Rotate 90 CW
            7 => (Some(90), false, true),   // Rotate 90 CW + mirror vertical (transverse)
            8 => (Some(270), false, false), // Rotate 90 CCW
            _ => (None, false, false),      // 1, absent or invalid: already upright
        }
    }

    /// Upright `data` according to its EXIF orientation tag.
    ///
    /// Returns `None` when the image is already upright (tag 1 or
    /// absent) — callers keep the original bytes untouched in that case.
    /// Re-encoding drops the EXIF block, so the tag cannot be applied
    /// twice by downstream viewers.
    pub fn auto_orient(
        data: &[u8],
        format: PhotoFormat,
        quality: u8,
    ) -> Result<Option<Vec<u8>>, CodecError> {
        let orientation = Self::read_orientation_tag(data);
        let (rotate, flip_h, flip_v) = Self::orientation_transforms(orientation);
        if rotate.is_none() && !flip_h && !flip_v {
            return Ok(None);
        }

        tracing::debug!(
            orientation,
            rotate = ?rotate,
            flip_horizontal = flip_h,
            flip_vertical = flip_v,
            "Applying EXIF orientation"
        );

        let mut img = ImageCodec::decode(data, format)?;

        if let Some(angle) = rotate {
            img = Self::rotate_by_angle(img, angle)?;
        }
        if flip_h {
            img = Self::flip_horizontal(img);
        }
        if flip_v {
            img = Self::flip_vertical(img);
        }

        ImageCodec::encode(&img, format, quality).map(Some)
    }

    /// Rotate clockwise by 90, 180 or 270 degrees. Any other angle is an
    /// input error, not a no-op.
    pub fn rotate_by_angle(img: DynamicImage, angle: u16) -> Result<DynamicImage, CodecError> {
        let rotated = match angle {
            90 => DynamicImage::ImageRgba8(imageops::rotate90(&img.to_rgba8())),
            180 => DynamicImage::ImageRgba8(imageops::rotate180(&img.to_rgba8())),
            270 => DynamicImage::ImageRgba8(imageops::rotate270(&img.to_rgba8())),
            other => return Err(CodecError::InvalidAngle(other)),
        };
        Ok(rotated)
    }

    pub fn flip_horizontal(img: DynamicImage) -> DynamicImage {
        DynamicImage::ImageRgba8(imageops::flip_horizontal(&img.to_rgba8()))
    }

    pub fn flip_vertical(img: DynamicImage) -> DynamicImage {
        DynamicImage::ImageRgba8(imageops::flip_vertical(&img.to_rgba8()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage, Rgba, RgbaImage};
    use little_exif::exif_tag::ExifTag;
    use little_exif::filetype::FileExtension;
    use little_exif::metadata::Metadata;

    #[test]
    fn test_orientation_transforms_table() {
        assert_eq!(ImageOrientation::orientation_transforms(1), (None, false, false));
        assert_eq!(ImageOrientation::orientation_transforms(2), (None, true, false));
        assert_eq!(
            ImageOrientation::orientation_transforms(3),
            (Some(180), false, false)
        );
        assert_eq!(ImageOrientation::orientation_transforms(4), (None, false, true));
        assert_eq!(
            ImageOrientation::orientation_transforms(5),
            (Some(90), true, false)
        );
        assert_eq!(
            ImageOrientation::orientation_transforms(6),
            (Some(90), false, false)
        );
        assert_eq!(
            ImageOrientation::orientation_transforms(7),
            (Some(90), false, true)
        );
        assert_eq!(
            ImageOrientation::orientation_transforms(8),
            (Some(270), false, false)
        );
        // Out-of-range values are treated as upright
        assert_eq!(ImageOrientation::orientation_transforms(0), (None, false, false));
        assert_eq!(ImageOrientation::orientation_transforms(9), (None, false, false));
    }

    #[test]
    fn test_rotate_by_angle_swaps_dimensions() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 2, Rgba([0, 0, 255, 255])));

        let rotated = ImageOrientation::rotate_by_angle(img.clone(), 90).unwrap();
        assert_eq!(rotated.dimensions(), (2, 4));

        let rotated = ImageOrientation::rotate_by_angle(img.clone(), 180).unwrap();
        assert_eq!(rotated.dimensions(), (4, 2));

        let rotated = ImageOrientation::rotate_by_angle(img, 270).unwrap();
        assert_eq!(rotated.dimensions(), (2, 4));
    }

    #[test]
    fn test_rotate_by_angle_rejects_other_angles() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255])));
        for angle in [0, 45, 91, 360] {
            let result = ImageOrientation::rotate_by_angle(img.clone(), angle);
            assert!(
                matches!(result, Err(CodecError::InvalidAngle(a)) if a == angle),
                "angle {} accepted",
                angle
            );
        }
    }

    #[test]
    fn test_read_orientation_without_exif() {
        let img = RgbImage::from_pixel(8, 8, Rgb([1, 2, 3]));
        let mut buffer = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut buffer),
            image::ImageFormat::Jpeg,
        )
        .unwrap();

        assert_eq!(ImageOrientation::read_orientation_tag(&buffer), 1);
        assert_eq!(ImageOrientation::read_orientation_tag(b"junk"), 1);
    }

    /// Left half red, right half blue; after correcting Orientation=6
    /// (camera rotated 90° CW) the red half must sit at the top.
    #[test]
    fn test_orientation_6_round_trip() {
        let mut img = RgbImage::new(64, 64);
        for (x, _y, p) in img.enumerate_pixels_mut() {
            *p = if x < 32 {
                Rgb([220, 20, 20])
            } else {
                Rgb([20, 20, 220])
            };
        }
        let mut data = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut data),
            image::ImageFormat::Jpeg,
        )
        .unwrap();

        let mut metadata = Metadata::new();
        metadata.set_tag(ExifTag::Orientation(vec![6u16]));
        metadata
            .write_to_vec(&mut data, FileExtension::JPEG)
            .unwrap();
        assert_eq!(ImageOrientation::read_orientation_tag(&data), 6);

        let oriented = ImageOrientation::auto_orient(&data, PhotoFormat::Jpeg, 92)
            .unwrap()
            .expect("orientation 6 must rewrite the image");

        let out = image::load_from_memory(&oriented).unwrap();
        assert_eq!(out.dimensions(), (64, 64));

        let top = out.get_pixel(32, 8);
        let bottom = out.get_pixel(32, 56);
        assert!(top[0] > 128 && top[2] < 128, "top not red: {:?}", top);
        assert!(
            bottom[2] > 128 && bottom[0] < 128,
            "bottom not blue: {:?}",
            bottom
        );

        // The rewrite drops the tag so viewers cannot rotate twice
        assert_eq!(ImageOrientation::read_orientation_tag(&oriented), 1);
    }

    #[test]
    fn test_auto_orient_noop_for_upright_image() {
        let img = RgbImage::from_pixel(8, 8, Rgb([1, 2, 3]));
        let mut data = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut data),
            image::ImageFormat::Jpeg,
        )
        .unwrap();

        let result = ImageOrientation::auto_orient(&data, PhotoFormat::Jpeg, 92).unwrap();
        assert!(result.is_none());
    }
}
