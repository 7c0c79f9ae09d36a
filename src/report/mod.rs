//! Report generation: JSON artifacts, image copy, and PDF rendering.
//!
//! The writer materializes one [`crate::domain::ReportBundle`] per
//! screening invocation. The classification JSON and the image copy are
//! always written; the severity JSON and the PDF only for COVID-19
//! predictions. Each run overwrites the previous contents of the output
//! directory.
//!
//! PDF rendering stages its inputs (the substituted template and a copy of
//! the X-ray) in a per-invocation temporary directory, so concurrent
//! invocations cannot race on a shared template file; the directory is
//! removed only after the renderer has consumed it.

pub mod records;
pub mod renderer;
pub mod template;

pub use records::{ClassificationRecord, SeverityRecord};
pub use renderer::{HtmlToPdf, Wkhtmltopdf};

use crate::core::config::ReportConfig;
use crate::core::constants::{REPORT_PDF_FILE, SEVERITY_FILE, STAGED_HTML_FILE};
use crate::core::errors::{CxrError, CxrResult};
use crate::domain::{Classification, ReportBundle, SeverityAssessment};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// Writes the report bundle for one screening invocation.
pub struct ReportWriter<'a> {
    config: &'a ReportConfig,
    renderer: &'a dyn HtmlToPdf,
}

impl<'a> ReportWriter<'a> {
    /// Creates a writer for the given configuration and rendering backend.
    pub fn new(config: &'a ReportConfig, renderer: &'a dyn HtmlToPdf) -> Self {
        Self { config, renderer }
    }

    /// Materializes the report bundle in the output directory.
    ///
    /// `severity` must be present exactly when the prediction is positive.
    /// Failures propagate immediately; a partial bundle may remain on disk
    /// and is the caller's to clean up.
    pub fn write(
        &self,
        classification: &Classification,
        severity: Option<&SeverityAssessment>,
        image_path: &Path,
    ) -> CxrResult<ReportBundle> {
        if severity.is_some() != classification.prediction.is_positive() {
            return Err(CxrError::invalid_input(format!(
                "severity data must accompany a COVID-19 prediction, got '{}'",
                classification.prediction
            )));
        }

        let out = &self.config.output_dir;
        fs::create_dir_all(out)?;

        let record = ClassificationRecord::new(classification);
        let prediction_json = out.join(self.config.prediction_filename());
        info!(
            "creating {} in {}",
            self.config.prediction_filename(),
            out.display()
        );
        write_json(&prediction_json, &record)?;

        let image_name = image_path
            .file_name()
            .ok_or_else(|| {
                CxrError::invalid_input(format!(
                    "image path has no filename: {}",
                    image_path.display()
                ))
            })?
            .to_owned();
        info!("copying input image to {}", out.display());
        let image_copy = out.join(&image_name);
        fs::copy(image_path, &image_copy)?;

        let Some(severity) = severity else {
            return Ok(ReportBundle {
                prediction_json,
                image_copy,
                severity_json: None,
                pdf: None,
            });
        };

        let severity_record = SeverityRecord::new(severity);
        let severity_json = out.join(SEVERITY_FILE);
        info!("creating {} in {}", SEVERITY_FILE, out.display());
        write_json(&severity_json, &severity_record)?;

        // Stage the render inputs in a scratch directory that lives until
        // the renderer has produced the PDF.
        let workdir = tempfile::Builder::new().prefix("cxr-report-").tempdir()?;
        fs::copy(image_path, workdir.path().join(&image_name))?;

        let template_path = self
            .config
            .template_dir
            .join(template::template_for(classification.prediction));
        let raw = fs::read_to_string(&template_path)?;
        let html = template::fill(
            &raw,
            &record,
            Some(&severity_record),
            &image_name.to_string_lossy(),
        );
        let staged = workdir.path().join(STAGED_HTML_FILE);
        fs::write(&staged, html)?;

        let pdf = out.join(REPORT_PDF_FILE);
        info!("creating {} in {}", REPORT_PDF_FILE, out.display());
        self.renderer.render(&staged, &pdf)?;

        Ok(ReportBundle {
            prediction_json,
            image_copy,
            severity_json: Some(severity_json),
            pdf: Some(pdf),
        })
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> CxrResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CxrError::invalid_input(format!("failed to serialize record: {e}")))?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SeverityScore, CxrClass};
    use std::path::PathBuf;

    /// Renderer that checks its input and writes a placeholder PDF.
    struct FakeRenderer;

    impl HtmlToPdf for FakeRenderer {
        fn render(&self, html_path: &Path, pdf_path: &Path) -> CxrResult<()> {
            let html = fs::read_to_string(html_path)?;
            assert!(
                !html.contains("${"),
                "renderer received unresolved tokens: {html}"
            );
            fs::write(pdf_path, b"%PDF-1.4 fake")?;
            Ok(())
        }
    }

    struct Fixture {
        _root: tempfile::TempDir,
        config: ReportConfig,
        image: PathBuf,
    }

    fn fixture() -> Fixture {
        let root = tempfile::tempdir().unwrap();
        let template_dir = root.path().join("pdftemplate");
        fs::create_dir(&template_dir).unwrap();
        fs::write(
            template_dir.join(template::POSITIVE_TEMPLATE),
            "<html>${PREDICTION_CLASSIFICATION} ${COVID-19} ${NORMAL} ${PNEUMONIA} \
             <img src=\"${X-RAY-IMAGE}\"/> ${GEO_SEVERITY} ${GEO_EXTENT_SCORE} \
             ${OPC_SEVERITY} ${OPC_EXTENT_SCORE}</html>",
        )
        .unwrap();
        fs::write(
            template_dir.join(template::NEGATIVE_TEMPLATE),
            "<html>${PREDICTION_CLASSIFICATION} <img src=\"${X-RAY-IMAGE}\"/></html>",
        )
        .unwrap();

        let image = root.path().join("xray.png");
        fs::write(&image, b"not really a png").unwrap();

        let config = ReportConfig::new(root.path().join("out")).template_dir(template_dir);
        Fixture {
            _root: root,
            config,
            image,
        }
    }

    fn severity() -> SeverityAssessment {
        SeverityAssessment {
            geographic: SeverityScore {
                severity: 0.717,
                extent_score: 5.733,
            },
            opacity: SeverityScore {
                severity: 0.42,
                extent_score: 2.52,
            },
        }
    }

    #[test]
    fn negative_path_writes_json_and_image_only() {
        let f = fixture();
        let classification = Classification::from_probabilities([0.8, 0.1, 0.1]);
        let bundle = ReportWriter::new(&f.config, &FakeRenderer)
            .write(&classification, None, &f.image)
            .unwrap();

        assert!(bundle.prediction_json.exists());
        assert!(bundle.image_copy.exists());
        assert!(bundle.severity_json.is_none());
        assert!(bundle.pdf.is_none());
        assert!(!f.config.output_dir.join(SEVERITY_FILE).exists());
        assert!(!f.config.output_dir.join(REPORT_PDF_FILE).exists());
    }

    #[test]
    fn positive_path_writes_full_bundle() {
        let f = fixture();
        let classification = Classification::from_probabilities([0.1, 0.1, 0.8]);
        let sev = severity();
        let bundle = ReportWriter::new(&f.config, &FakeRenderer)
            .write(&classification, Some(&sev), &f.image)
            .unwrap();

        assert!(bundle.prediction_json.exists());
        assert!(bundle.image_copy.exists());
        assert!(bundle.severity_json.as_ref().unwrap().exists());
        assert!(bundle.pdf.as_ref().unwrap().exists());

        let severity_json =
            fs::read_to_string(bundle.severity_json.unwrap()).unwrap();
        assert!(severity_json.contains("\"Geographic severity\": \"0.717\""));
        assert!(severity_json.contains("\"Opacity extent score\": \"2.520\""));
    }

    #[test]
    fn severity_without_positive_prediction_is_rejected() {
        let f = fixture();
        let classification = Classification::from_probabilities([0.8, 0.1, 0.1]);
        let sev = severity();
        let result =
            ReportWriter::new(&f.config, &FakeRenderer).write(&classification, Some(&sev), &f.image);
        assert!(matches!(result, Err(CxrError::InvalidInput { .. })));
        assert_eq!(classification.prediction, CxrClass::Normal);
    }

    #[test]
    fn missing_template_aborts_after_partial_output() {
        let f = fixture();
        fs::remove_file(f.config.template_dir.join(template::POSITIVE_TEMPLATE)).unwrap();
        let classification = Classification::from_probabilities([0.1, 0.1, 0.8]);
        let sev = severity();
        let result =
            ReportWriter::new(&f.config, &FakeRenderer).write(&classification, Some(&sev), &f.image);

        assert!(result.is_err());
        // Classification succeeded, reporting failed: earlier artifacts remain.
        assert!(f
            .config
            .output_dir
            .join(f.config.prediction_filename())
            .exists());
        assert!(!f.config.output_dir.join(REPORT_PDF_FILE).exists());
    }

    #[test]
    fn rerun_produces_byte_identical_json() {
        let f = fixture();
        let classification = Classification::from_probabilities([0.1, 0.1, 0.8]);
        let sev = severity();
        let writer = ReportWriter::new(&f.config, &FakeRenderer);

        let first = writer
            .write(&classification, Some(&sev), &f.image)
            .unwrap();
        let first_bytes = fs::read(&first.prediction_json).unwrap();
        let first_severity = fs::read(first.severity_json.as_ref().unwrap()).unwrap();

        fs::remove_dir_all(&f.config.output_dir).unwrap();
        let second = writer
            .write(&classification, Some(&sev), &f.image)
            .unwrap();

        assert_eq!(first_bytes, fs::read(&second.prediction_json).unwrap());
        assert_eq!(
            first_severity,
            fs::read(second.severity_json.as_ref().unwrap()).unwrap()
        );
    }
}
