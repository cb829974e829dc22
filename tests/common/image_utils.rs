//! Image inspection utilities for testing.

use image::{DynamicImage, GenericImageView, ImageError, ImageFormat};

/// Load an image from a byte array
pub fn load_image_from_bytes(bytes: &[u8]) -> Result<DynamicImage, ImageError> {
    image::load_from_memory(bytes)
}

/// Detect image format from bytes
pub fn detect_image_format(bytes: &[u8]) -> Option<ImageFormat> {
    image::guess_format(bytes).ok()
}

/// Count pixels that differ from `background`
pub fn count_non_background(image: &DynamicImage, background: [u8; 4]) -> usize {
    image
        .pixels()
        .filter(|(_, _, pixel)| pixel.0 != background)
        .count()
}

/// Whether any pixel has exactly this color
pub fn contains_color(image: &DynamicImage, color: [u8; 4]) -> bool {
    image.pixels().any(|(_, _, pixel)| pixel.0 == color)
}
