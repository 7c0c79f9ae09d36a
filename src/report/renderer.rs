//! HTML-to-PDF rendering via an external renderer.

use crate::core::errors::{CxrError, CxrResult};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Converts a templated HTML file into a PDF on disk.
///
/// The trait is the seam between report generation and the rendering
/// backend; tests substitute a fake implementation.
pub trait HtmlToPdf {
    /// Renders `html_path` into `pdf_path`.
    fn render(&self, html_path: &Path, pdf_path: &Path) -> CxrResult<()>;
}

/// Renderer backed by the `wkhtmltopdf` command-line tool.
#[derive(Debug, Clone)]
pub struct Wkhtmltopdf {
    binary: PathBuf,
}

impl Wkhtmltopdf {
    /// Creates a renderer invoking the given binary.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for Wkhtmltopdf {
    /// Resolves `wkhtmltopdf` from the search path.
    fn default() -> Self {
        Self::new("wkhtmltopdf")
    }
}

impl HtmlToPdf for Wkhtmltopdf {
    fn render(&self, html_path: &Path, pdf_path: &Path) -> CxrResult<()> {
        debug!(
            "rendering {} -> {}",
            html_path.display(),
            pdf_path.display()
        );
        // Local file access so the template can reference the staged image.
        let output = Command::new(&self.binary)
            .arg("--enable-local-file-access")
            .arg(html_path)
            .arg(pdf_path)
            .output()
            .map_err(|e| {
                CxrError::render(format!(
                    "failed to launch '{}': {e}",
                    self.binary.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CxrError::render(format!(
                "'{}' exited with {}: {}",
                self.binary.display(),
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_surfaces_as_render_error() {
        let renderer = Wkhtmltopdf::new("/nonexistent/wkhtmltopdf");
        let result = renderer.render(Path::new("in.html"), Path::new("out.pdf"));
        assert!(matches!(result, Err(CxrError::Render { .. })));
    }
}
