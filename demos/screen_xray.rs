//! Chest X-ray Screening Example
//!
//! Classifies a single chest X-ray as normal, pneumonia, or COVID-19.
//! For COVID-19 predictions the two severity models are run as well, and
//! a PDF report is rendered into the output directory.
//!
//! Usage:
//! ```
//! cargo run --example screen_xray -- \
//!     --classifier-model models/classifier.onnx \
//!     --geo-model models/sev-geo.onnx \
//!     --opc-model models/sev-opc.onnx \
//!     --input-dir assets --image-file ex-covid.jpeg
//! ```

use clap::Parser;
use cxr_screen::core::init_tracing;
use cxr_screen::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Command-line arguments for the screening example
#[derive(Parser)]
#[command(name = "screen_xray")]
#[command(about = "Chest X-ray Screening Example - classifies an X-ray and reports severity")]
struct Args {
    /// Path to the classifier model file
    #[arg(long)]
    classifier_model: PathBuf,

    /// Path to the geographic-severity model file
    #[arg(long)]
    geo_model: PathBuf,

    /// Path to the opacity-severity model file
    #[arg(long)]
    opc_model: PathBuf,

    /// Directory containing the input image
    #[arg(long)]
    input_dir: PathBuf,

    /// Filename of the X-ray image inside the input directory
    #[arg(long)]
    image_file: String,

    /// Directory the report bundle is written into
    #[arg(long, default_value = "results")]
    output_dir: PathBuf,

    /// Directory containing the HTML report templates
    #[arg(long, default_value = "pdftemplate")]
    template_dir: PathBuf,

    /// Model input resolution
    #[arg(long, default_value_t = 480)]
    input_size: u32,

    /// Fraction of image height cropped off the top
    #[arg(long, default_value_t = 0.08)]
    top_percent: f32,

    /// Name of the image input tensor
    #[arg(long, default_value = "input_1")]
    in_tensor: String,

    /// Name of the logits output tensor
    #[arg(long, default_value = "MLP/dense_1/MatMul")]
    out_tensor: String,

    /// Tag embedded in the prediction JSON filename
    #[arg(long, default_value = "default")]
    model_tag: String,

    /// Path to the wkhtmltopdf binary
    #[arg(long, default_value = "wkhtmltopdf")]
    wkhtmltopdf: PathBuf,
}

fn model_config(args: &Args, path: &Path, name: &str) -> ModelConfig {
    ModelConfig::new(path, name)
        .input_name(&args.in_tensor)
        .output_name(&args.out_tensor)
        .input_size(args.input_size)
        .top_percent(args.top_percent)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args = Args::parse();

    for model in [&args.classifier_model, &args.geo_model, &args.opc_model] {
        if !model.exists() {
            error!("Model file not found: {}", model.display());
            return Err("Model file not found".into());
        }
    }

    let config = ScreenerConfig {
        classifier: model_config(&args, &args.classifier_model, "classifier"),
        severity_geo: model_config(&args, &args.geo_model, "sev-geo"),
        severity_opc: model_config(&args, &args.opc_model, "sev-opc"),
        report: ReportConfig::new(&args.output_dir)
            .template_dir(&args.template_dir)
            .model_tag(&args.model_tag)
            .wkhtmltopdf(&args.wkhtmltopdf),
    };

    let screener = XrayScreener::new(config)?;
    let report = screener.screen(&args.input_dir, &args.image_file)?;

    info!("Prediction: {}", report.classification.prediction);
    info!(
        "Confidence: normal={:.4}, pneumonia={:.4}, COVID-19={:.4}",
        report.classification.probabilities[0],
        report.classification.probabilities[1],
        report.classification.probabilities[2],
    );
    if let Some(severity) = &report.severity {
        info!(
            "Geographic severity: {:.3} (extent score {:.3})",
            severity.geographic.severity, severity.geographic.extent_score
        );
        info!(
            "Opacity severity: {:.3} (extent score {:.3})",
            severity.opacity.severity, severity.opacity.extent_score
        );
    }
    info!(
        "Report written to {}",
        report.artifacts.prediction_json.display()
    );

    Ok(())
}
