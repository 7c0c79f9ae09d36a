//! Image preprocessing and score aggregation.
//!
//! # Modules
//!
//! * `preprocess` - Cropping, resizing, and tensor conversion for model input
//! * `scoring` - Softmax, argmax, and severity scoring over model outputs

pub mod preprocess;
pub mod scoring;

pub use preprocess::{central_crop, crop_top, to_tensor, Preprocessor};
pub use scoring::{argmax, severity_score, softmax};
