//! Image preprocessing for the screening models.
//!
//! X-rays are prepared the way the models were trained: the top band of the
//! image (annotations, equipment markers) is cropped off, the largest
//! centered square is taken, and the result is resized to the model's input
//! resolution with intensities scaled into [0, 1].

use crate::core::errors::{CxrError, CxrResult, ProcessingStage};
use crate::core::inference::Tensor4D;
use image::imageops::{self, FilterType};
use image::RgbImage;
use ndarray::Array4;

/// Drops the top `percent` fraction of image rows.
pub fn crop_top(img: &RgbImage, percent: f32) -> CxrResult<RgbImage> {
    let offset = (img.height() as f32 * percent).floor() as u32;
    if offset >= img.height() {
        return Err(CxrError::processing(
            ProcessingStage::Crop,
            format!(
                "top crop of {percent} removes all {} rows of the image",
                img.height()
            ),
        ));
    }
    Ok(imageops::crop_imm(img, 0, offset, img.width(), img.height() - offset).to_image())
}

/// Takes the largest centered square of the image.
pub fn central_crop(img: &RgbImage) -> RgbImage {
    let size = img.width().min(img.height());
    let offset_x = (img.width() - size) / 2;
    let offset_y = (img.height() - size) / 2;
    imageops::crop_imm(img, offset_x, offset_y, size, size).to_image()
}

/// Converts an image to an NHWC float tensor with intensities in [0, 1].
pub fn to_tensor(img: &RgbImage) -> Tensor4D {
    let (width, height) = img.dimensions();
    let mut tensor = Array4::<f32>::zeros((1, height as usize, width as usize, 3));
    for (x, y, pixel) in img.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, y as usize, x as usize, c]] = pixel[c] as f32 / 255.0;
        }
    }
    tensor
}

/// Prepares X-ray images for one model's input requirements.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    top_percent: f32,
    target_size: u32,
}

impl Preprocessor {
    /// Creates a preprocessor for the given crop fraction and input
    /// resolution.
    pub fn new(top_percent: f32, target_size: u32) -> CxrResult<Self> {
        if target_size == 0 {
            return Err(CxrError::processing(
                ProcessingStage::Resize,
                "target size must be greater than 0",
            ));
        }
        if !(0.0..1.0).contains(&top_percent) {
            return Err(CxrError::processing(
                ProcessingStage::Crop,
                format!("top crop percent must be in [0, 1), got {top_percent}"),
            ));
        }
        Ok(Self {
            top_percent,
            target_size,
        })
    }

    /// Runs the full preprocessing chain: top crop, central crop, resize,
    /// and conversion to a normalized NHWC tensor.
    pub fn run(&self, img: &RgbImage) -> CxrResult<Tensor4D> {
        let cropped = crop_top(img, self.top_percent)?;
        let squared = central_crop(&cropped);
        let resized = imageops::resize(
            &squared,
            self.target_size,
            self.target_size,
            FilterType::Triangle,
        );
        Ok(to_tensor(&resized))
    }
}
