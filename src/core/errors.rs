//! Error types for the screening pipeline.
//!
//! This module defines the error types that can occur while screening a
//! chest X-ray: image loading errors, preprocessing errors, model loading
//! and inference errors, configuration errors, and report generation
//! errors. Constructor helpers create well-structured errors with context.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Convenient result alias for screening operations.
pub type CxrResult<T> = Result<T, CxrError>;

/// Enum representing different stages of image preprocessing.
///
/// Identifies which preprocessing stage an error occurred in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProcessingStage {
    /// Error occurred while cropping the image.
    Crop,
    /// Error occurred while resizing the image.
    Resize,
    /// Error occurred while normalizing pixel intensities.
    Normalization,
    /// Error occurred during tensor operations.
    TensorOperation,
    /// Error occurred during post-processing of model outputs.
    PostProcessing,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Crop => write!(f, "crop"),
            ProcessingStage::Resize => write!(f, "resize"),
            ProcessingStage::Normalization => write!(f, "normalization"),
            ProcessingStage::TensorOperation => write!(f, "tensor operation"),
            ProcessingStage::PostProcessing => write!(f, "post-processing"),
        }
    }
}

/// Enum representing the errors that can occur in the screening pipeline.
#[derive(Error, Debug)]
pub enum CxrError {
    /// Error occurred while loading an image.
    #[error("image load")]
    ImageLoad(#[from] image::ImageError),

    /// Error occurred during preprocessing.
    #[error("{stage} failed: {context}")]
    Processing {
        /// The preprocessing stage where the error occurred.
        stage: ProcessingStage,
        /// Additional context about the error.
        context: String,
    },

    /// Error occurred while loading a model into a runtime session.
    #[error("failed to load model at {}: {context}", path.display())]
    ModelLoad {
        /// Path to the model file.
        path: PathBuf,
        /// Additional context about the error.
        context: String,
        /// The underlying runtime error, if any.
        #[source]
        source: Option<ort::Error>,
    },

    /// Error occurred during inference.
    #[error("inference with model '{model}' failed: {context}")]
    Inference {
        /// Name of the model that failed.
        model: String,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    Config {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error occurred while rendering the report PDF.
    #[error("pdf rendering: {context}")]
    Render {
        /// Additional context about the error.
        context: String,
    },

    /// Error from the ONNX Runtime session.
    #[error(transparent)]
    Session(#[from] ort::Error),

    /// Error from tensor operations.
    #[error("tensor operation")]
    Tensor(#[from] ndarray::ShapeError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl CxrError {
    /// Creates a CxrError for a preprocessing failure.
    pub fn processing(stage: ProcessingStage, context: impl Into<String>) -> Self {
        Self::Processing {
            stage,
            context: context.into(),
        }
    }

    /// Creates a CxrError for a model load failure.
    pub fn model_load(
        path: impl AsRef<Path>,
        context: impl Into<String>,
        source: Option<ort::Error>,
    ) -> Self {
        Self::ModelLoad {
            path: path.as_ref().to_path_buf(),
            context: context.into(),
            source,
        }
    }

    /// Creates a CxrError for an inference failure.
    pub fn inference(
        model: impl Into<String>,
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Inference {
            model: model.into(),
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Creates a CxrError for invalid input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a CxrError for a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a CxrError for a PDF rendering failure.
    pub fn render(context: impl Into<String>) -> Self {
        Self::Render {
            context: context.into(),
        }
    }
}

impl From<crate::core::config::ConfigError> for CxrError {
    fn from(error: crate::core::config::ConfigError) -> Self {
        Self::Config {
            message: error.to_string(),
        }
    }
}

/// A minimal error type used when a failure has no underlying source.
#[derive(Debug)]
pub struct SimpleError {
    message: String,
}

impl SimpleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SimpleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SimpleError {}
