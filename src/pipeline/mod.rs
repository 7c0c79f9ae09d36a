//! The screening pipeline: preprocessing, classification, conditional
//! severity assessment, and report generation.
//!
//! Each invocation is self-contained and synchronous: it opens a dedicated
//! runtime session per model pass, runs the forward passes sequentially,
//! and releases every session before returning. No state is shared across
//! invocations.

use crate::core::config::{ModelConfig, ScreenerConfig};
use crate::core::constants::{GEO_EXTENT_SCALE, NUM_CLASSES, OPC_EXTENT_SCALE, SEVERITY_STEP};
use crate::core::errors::{CxrError, CxrResult, SimpleError};
use crate::core::inference::ModelHandle;
use crate::domain::{Classification, ScreeningReport, SeverityAssessment, SeverityScore};
use crate::processors::preprocess::Preprocessor;
use crate::processors::scoring::{severity_score, softmax};
use crate::report::{HtmlToPdf, ReportWriter, Wkhtmltopdf};
use crate::utils::load_image;
use image::RgbImage;
use std::path::Path;
use tracing::{debug, info};

/// Screens chest X-rays: classifies a single image and, for COVID-19
/// predictions, assesses severity and renders a PDF report.
pub struct XrayScreener {
    config: ScreenerConfig,
    renderer: Box<dyn HtmlToPdf>,
}

impl std::fmt::Debug for XrayScreener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XrayScreener")
            .field("config", &self.config)
            .finish()
    }
}

impl XrayScreener {
    /// Creates a screener rendering PDFs with the configured wkhtmltopdf
    /// binary.
    pub fn new(config: ScreenerConfig) -> CxrResult<Self> {
        let renderer = Box::new(Wkhtmltopdf::new(config.report.wkhtmltopdf.clone()));
        Self::with_renderer(config, renderer)
    }

    /// Creates a screener with a custom rendering backend.
    pub fn with_renderer(
        config: ScreenerConfig,
        renderer: Box<dyn HtmlToPdf>,
    ) -> CxrResult<Self> {
        config.validate()?;
        Ok(Self { config, renderer })
    }

    /// Screens one X-ray image and materializes the report bundle.
    ///
    /// The image is read from `<input_dir>/<image_file>`. Severity is
    /// assessed exactly when the classifier predicts COVID-19.
    pub fn screen(&self, input_dir: &Path, image_file: &str) -> CxrResult<ScreeningReport> {
        let image_path = input_dir.join(image_file);
        info!("screening {}", image_path.display());
        let image = load_image(&image_path)?;

        let classification = self.classify(&image)?;
        info!(
            "prediction: {} (normal={:.4}, pneumonia={:.4}, COVID-19={:.4})",
            classification.prediction,
            classification.probabilities[0],
            classification.probabilities[1],
            classification.probabilities[2],
        );

        let severity = if classification.prediction.is_positive() {
            Some(self.assess_severity(&image)?)
        } else {
            None
        };

        let writer = ReportWriter::new(&self.config.report, self.renderer.as_ref());
        let artifacts = writer.write(&classification, severity.as_ref(), &image_path)?;

        Ok(ScreeningReport {
            classification,
            severity,
            artifacts,
        })
    }

    fn classify(&self, image: &RgbImage) -> CxrResult<Classification> {
        let probs = self.forward_softmax(&self.config.classifier, image)?;
        Ok(Classification::from_probabilities(probs))
    }

    fn assess_severity(&self, image: &RgbImage) -> CxrResult<SeverityAssessment> {
        let geographic = self.severity_pass(&self.config.severity_geo, image, GEO_EXTENT_SCALE)?;
        let opacity = self.severity_pass(&self.config.severity_opc, image, OPC_EXTENT_SCALE)?;
        Ok(SeverityAssessment {
            geographic,
            opacity,
        })
    }

    fn severity_pass(
        &self,
        config: &ModelConfig,
        image: &RgbImage,
        extent_scale: f32,
    ) -> CxrResult<SeverityScore> {
        let probs = self.forward_softmax(config, image)?;
        let severity = severity_score(&probs, SEVERITY_STEP);
        debug!(
            "model '{}': severity {:.4}, extent {:.4}",
            config.model_name,
            severity,
            severity * extent_scale
        );
        Ok(SeverityScore {
            severity,
            extent_score: severity * extent_scale,
        })
    }

    /// Runs one preprocessing + forward pass and returns the softmax
    /// distribution over the three classes.
    ///
    /// The session lives only for this call: the handle is loaded here and
    /// dropped on return, on both success and error paths.
    fn forward_softmax(
        &self,
        config: &ModelConfig,
        image: &RgbImage,
    ) -> CxrResult<[f32; NUM_CLASSES]> {
        let tensor = Preprocessor::new(config.top_percent, config.input_size)?.run(image)?;
        let mut model = ModelHandle::load(config)?;
        let logits = model.infer_logits(&tensor)?;

        if logits.nrows() != 1 || logits.ncols() != NUM_CLASSES {
            return Err(CxrError::inference(
                &config.model_name,
                format!(
                    "expected [1, {NUM_CLASSES}] logits, got [{}, {}]",
                    logits.nrows(),
                    logits.ncols()
                ),
                SimpleError::new("unexpected logits shape"),
            ));
        }

        let row: Vec<f32> = logits.row(0).to_vec();
        let probs = softmax(&row);
        let mut out = [0.0; NUM_CLASSES];
        out.copy_from_slice(&probs);
        Ok(out)
    }
}

/// Builder for [`XrayScreener`].
pub struct XrayScreenerBuilder {
    config: ScreenerConfig,
    renderer: Option<Box<dyn HtmlToPdf>>,
}

impl XrayScreenerBuilder {
    /// Starts from a full configuration.
    pub fn new(config: ScreenerConfig) -> Self {
        Self {
            config,
            renderer: None,
        }
    }

    /// Overrides the rendering backend.
    pub fn renderer(mut self, renderer: Box<dyn HtmlToPdf>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Validates the configuration and builds the screener.
    pub fn build(self) -> CxrResult<XrayScreener> {
        match self.renderer {
            Some(renderer) => XrayScreener::with_renderer(self.config, renderer),
            None => XrayScreener::new(self.config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{ModelConfig, ReportConfig};

    fn config() -> ScreenerConfig {
        ScreenerConfig {
            classifier: ModelConfig::new("models/classifier.onnx", "classifier"),
            severity_geo: ModelConfig::new("models/sev-geo.onnx", "sev-geo"),
            severity_opc: ModelConfig::new("models/sev-opc.onnx", "sev-opc"),
            report: ReportConfig::new("out"),
        }
    }

    #[test]
    fn builder_rejects_invalid_config() {
        let mut bad = config();
        bad.classifier.input_size = 0;
        assert!(XrayScreenerBuilder::new(bad).build().is_err());
    }

    #[test]
    fn builder_accepts_valid_config() {
        assert!(XrayScreenerBuilder::new(config()).build().is_ok());
    }

    #[test]
    fn screening_fails_cleanly_without_model_files() {
        let screener = XrayScreener::new(config()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let image = image::RgbImage::new(64, 64);
        image.save(dir.path().join("xray.png")).unwrap();

        // Image loads fine; the classifier model is absent, so the run
        // aborts with a model-load error before any report is written.
        let result = screener.screen(dir.path(), "xray.png");
        assert!(matches!(result, Err(CxrError::ModelLoad { .. })));
    }
}
