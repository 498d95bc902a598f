//! Grayscale PNG preview of image data

use image::{GrayImage, Luma};
use std::path::Path;

use crate::extractor::raster::ImageData;
use crate::fits::errors::{FitsError, FitsResult};

/// Render image data as an 8-bit grayscale image
///
/// Values are stretched linearly between the finite minimum and maximum;
/// non-finite samples are drawn black. FITS row 0 is the bottom of the
/// image, so rows are flipped vertically.
///
/// # Arguments
/// * `data` - Samples to render
///
/// # Returns
/// The rendered grayscale image
pub fn render_preview(data: &ImageData) -> GrayImage {
    let (height, width) = (data.height() as u32, data.width() as u32);
    let (min, max) = data.min_max().unwrap_or((0.0, 0.0));
    let range = max - min;

    let mut preview = GrayImage::new(width, height);
    for y in 0..height {
        let row = (height - 1 - y) as usize;
        for x in 0..width {
            let value = data.get_f64(row, x as usize).unwrap_or(f64::NAN);
            let level = if !value.is_finite() {
                0
            } else if range > 0.0 {
                (((value - min) / range) * 255.0).round().clamp(0.0, 255.0) as u8
            } else {
                128
            };
            preview.put_pixel(x, y, Luma([level]));
        }
    }

    preview
}

/// Render image data and save it as a PNG file
pub fn save_preview(data: &ImageData, path: &Path) -> FitsResult<()> {
    render_preview(data)
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| FitsError::GenericError(format!("Failed to write preview {}: {}", path.display(), e)))
}
