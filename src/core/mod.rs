//! The core module of the screening pipeline.
//!
//! This module contains the fundamental components of the pipeline:
//! - Configuration management
//! - Constants used throughout the pipeline
//! - Error handling
//! - Inference engine integration
//!
//! It also re-exports commonly used types for convenience.

pub mod config;
pub mod constants;
pub mod errors;
pub mod inference;

pub use config::{ConfigError, ModelConfig, ReportConfig, ScreenerConfig};
pub use constants::*;
pub use errors::{CxrError, CxrResult, ProcessingStage};
pub use inference::{ModelHandle, Tensor4D};

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and
/// formatting layer. It's typically called at the start of an application to
/// enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
