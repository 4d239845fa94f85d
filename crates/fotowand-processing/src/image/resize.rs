//! Bounded, aspect-preserving resize.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};

use super::format::PhotoFormat;

/// Dimensions after fitting `(width, height)` into `(max_w, max_h)`.
///
/// Scale factor is `min(max_w/width, max_h/height)` capped at 1.0 — an
/// image already inside the bounds keeps its dimensions. Aspect ratio is
/// preserved; results round to whole pixels, never below 1.
pub fn bounded_dimensions(width: u32, height: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    let scale = f64::min(max_w as f64 / width as f64, max_h as f64 / height as f64);
    if scale >= 1.0 {
        return (width, height);
    }
    let new_w = ((width as f64 * scale).round() as u32).max(1);
    let new_h = ((height as f64 * scale).round() as u32).max(1);
    (new_w, new_h)
}

/// Resize to fit the bounds. Alpha-capable sources are flattened onto a
/// fully transparent canvas before resampling so transparent edges do not
/// pick up black fringes.
pub fn resize_to_fit(
    img: &DynamicImage,
    format: PhotoFormat,
    max_w: u32,
    max_h: u32,
) -> DynamicImage {
    let (width, height) = img.dimensions();
    let (new_w, new_h) = bounded_dimensions(width, height, max_w, max_h);
    if (new_w, new_h) == (width, height) {
        return img.clone();
    }

    let source = if format.preserves_alpha() {
        let mut canvas = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
        imageops::overlay(&mut canvas, &img.to_rgba8(), 0, 0);
        canvas
    } else {
        img.to_rgba8()
    };

    DynamicImage::ImageRgba8(imageops::resize(&source, new_w, new_h, FilterType::Lanczos3))
}
