//! # cxr-screen
//!
//! A Rust library that screens chest X-ray images using ONNX models.
//! One invocation classifies an image as normal, pneumonia, or COVID-19;
//! positive predictions additionally run two severity models (geographic
//! and opacity extent) and render a PDF report.
//!
//! ## Features
//!
//! - ONNX Runtime integration for fast inference
//! - Preprocessing matched to the models' training setup (top crop,
//!   central crop, resize, [0, 1] intensity scaling)
//! - Softmax classification and probability-weighted severity scoring
//! - Report bundle generation: JSON artifacts, image copy, and a PDF
//!   rendered from HTML templates via wkhtmltopdf
//!
//! ## Modules
//!
//! * [`core`] - Configuration, error handling, and session management
//! * [`domain`] - Result types: classes, classifications, severity, reports
//! * [`processors`] - Image preprocessing and score aggregation
//! * [`report`] - Report bundle generation
//! * [`pipeline`] - The end-to-end screening pipeline
//! * [`utils`] - Image loading helpers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cxr_screen::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ScreenerConfig {
//!     classifier: ModelConfig::new("models/classifier.onnx", "classifier")
//!         .phase_input_name("keras_learning_phase"),
//!     severity_geo: ModelConfig::new("models/sev-geo.onnx", "sev-geo"),
//!     severity_opc: ModelConfig::new("models/sev-opc.onnx", "sev-opc"),
//!     report: ReportConfig::new("results"),
//! };
//!
//! let screener = XrayScreener::new(config)?;
//! let report = screener.screen(Path::new("assets"), "ex-covid.jpeg")?;
//!
//! println!("prediction: {}", report.classification.prediction);
//! if let Some(severity) = &report.severity {
//!     println!("geographic extent: {:.3}", severity.geographic.extent_score);
//! }
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod domain;
pub mod pipeline;
pub mod processors;
pub mod report;
pub mod utils;

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use cxr_screen::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{
        CxrError, CxrResult, ModelConfig, ReportConfig, ScreenerConfig,
    };
    pub use crate::domain::{Classification, CxrClass, ScreeningReport, SeverityAssessment};
    pub use crate::pipeline::{XrayScreener, XrayScreenerBuilder};
    pub use crate::utils::load_image;
}
