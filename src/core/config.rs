//! Configuration types for the screening pipeline.
//!
//! Each model pass (classifier, geographic severity, opacity severity) is
//! described by a [`ModelConfig`]; report generation by a [`ReportConfig`].
//! [`ScreenerConfig`] bundles them for a full screening run. All configs are
//! serde-serializable so a whole screener can be described in JSON.

use crate::core::constants::{
    DEFAULT_INPUT_SIZE, DEFAULT_INPUT_TENSOR, DEFAULT_OUTPUT_TENSOR, DEFAULT_TOP_PERCENT,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error indicating that the model input resolution is invalid.
    #[error("input size must be greater than 0")]
    InvalidInputSize,

    /// Error indicating that the top-crop fraction is out of range.
    #[error("top crop percent must be in [0, 1), got {value}")]
    InvalidCropPercent { value: f32 },

    /// Error indicating that a configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Configuration for one model pass.
///
/// Identifies the model artifact on disk, the tensor names inside the graph,
/// and the preprocessing parameters the model was trained with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the ONNX model file.
    pub model_path: PathBuf,
    /// Name used for this model in logs and errors.
    pub model_name: String,
    /// Name of the image input tensor.
    pub input_name: String,
    /// Name of the learning-phase flag tensor, if the graph declares one.
    /// When set, `false` is fed to it on every forward pass.
    pub phase_input_name: Option<String>,
    /// Name of the logits output tensor.
    pub output_name: String,
    /// Spatial resolution the model expects (square input).
    pub input_size: u32,
    /// Fraction of image height cropped off the top before the center crop.
    pub top_percent: f32,
}

impl ModelConfig {
    /// Creates a model configuration with default tensor names and
    /// preprocessing parameters.
    pub fn new(model_path: impl Into<PathBuf>, model_name: impl Into<String>) -> Self {
        Self {
            model_path: model_path.into(),
            model_name: model_name.into(),
            input_name: DEFAULT_INPUT_TENSOR.to_string(),
            phase_input_name: None,
            output_name: DEFAULT_OUTPUT_TENSOR.to_string(),
            input_size: DEFAULT_INPUT_SIZE,
            top_percent: DEFAULT_TOP_PERCENT,
        }
    }

    /// Sets the image input tensor name.
    pub fn input_name(mut self, name: impl Into<String>) -> Self {
        self.input_name = name.into();
        self
    }

    /// Sets the learning-phase flag tensor name.
    pub fn phase_input_name(mut self, name: impl Into<String>) -> Self {
        self.phase_input_name = Some(name.into());
        self
    }

    /// Sets the logits output tensor name.
    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = name.into();
        self
    }

    /// Sets the input resolution.
    pub fn input_size(mut self, size: u32) -> Self {
        self.input_size = size;
        self
    }

    /// Sets the top-crop fraction.
    pub fn top_percent(mut self, percent: f32) -> Self {
        self.top_percent = percent;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_size == 0 {
            return Err(ConfigError::InvalidInputSize);
        }
        if !(0.0..1.0).contains(&self.top_percent) {
            return Err(ConfigError::InvalidCropPercent {
                value: self.top_percent,
            });
        }
        if self.model_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidConfig {
                message: format!("model '{}' has an empty model path", self.model_name),
            });
        }
        if self.input_name.is_empty() || self.output_name.is_empty() {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "model '{}' must name its input and output tensors",
                    self.model_name
                ),
            });
        }
        Ok(())
    }
}

/// Configuration for report generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Directory the report bundle is written into (created if absent).
    pub output_dir: PathBuf,
    /// Directory containing the HTML report templates.
    pub template_dir: PathBuf,
    /// Tag embedded in the prediction JSON filename.
    pub model_tag: String,
    /// Path or name of the wkhtmltopdf binary used for PDF rendering.
    pub wkhtmltopdf: PathBuf,
}

impl ReportConfig {
    /// Creates a report configuration with the conventional template
    /// directory, model tag, and renderer binary.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            template_dir: PathBuf::from("pdftemplate"),
            model_tag: "default".to_string(),
            wkhtmltopdf: PathBuf::from("wkhtmltopdf"),
        }
    }

    /// Sets the template directory.
    pub fn template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.template_dir = dir.into();
        self
    }

    /// Sets the model tag used in the prediction JSON filename.
    pub fn model_tag(mut self, tag: impl Into<String>) -> Self {
        self.model_tag = tag.into();
        self
    }

    /// Sets the wkhtmltopdf binary.
    pub fn wkhtmltopdf(mut self, binary: impl Into<PathBuf>) -> Self {
        self.wkhtmltopdf = binary.into();
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidConfig {
                message: "output directory must not be empty".to_string(),
            });
        }
        if self.model_tag.is_empty() {
            return Err(ConfigError::InvalidConfig {
                message: "model tag must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Filename of the classification JSON for this configuration.
    pub fn prediction_filename(&self) -> String {
        format!("prediction-{}.json", self.model_tag)
    }
}

/// Full configuration for a screening run: the classifier, the two severity
/// models, and report generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenerConfig {
    /// The three-class chest X-ray classifier.
    pub classifier: ModelConfig,
    /// The geographic-extent severity model.
    pub severity_geo: ModelConfig,
    /// The opacity-extent severity model.
    pub severity_opc: ModelConfig,
    /// Report generation parameters.
    pub report: ReportConfig,
}

impl ScreenerConfig {
    /// Validates every nested configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.classifier.validate()?;
        self.severity_geo.validate()?;
        self.severity_opc.validate()?;
        self.report.validate()
    }
}
