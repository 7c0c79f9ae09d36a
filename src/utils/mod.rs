//! Utility functions for image loading.

use crate::core::errors::{CxrError, CxrResult};
use image::{DynamicImage, RgbImage};
use std::path::Path;

/// Converts a DynamicImage to an RgbImage.
pub fn dynamic_to_rgb(img: DynamicImage) -> RgbImage {
    img.to_rgb8()
}

/// Loads an image from a file path and converts it to RgbImage.
///
/// Handles any image format supported by the image crate. X-rays stored as
/// grayscale are expanded to three identical channels.
pub fn load_image(path: &Path) -> CxrResult<RgbImage> {
    let img = image::open(path).map_err(CxrError::ImageLoad)?;
    Ok(dynamic_to_rgb(img))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_image_fails_for_missing_file() {
        assert!(load_image(Path::new("no/such/image.png")).is_err());
    }

    #[test]
    fn grayscale_images_expand_to_rgb() {
        let gray = image::GrayImage::from_pixel(4, 4, image::Luma([200]));
        let rgb = dynamic_to_rgb(DynamicImage::ImageLuma8(gray));
        assert_eq!(rgb.get_pixel(0, 0), &image::Rgb([200, 200, 200]));
    }
}
