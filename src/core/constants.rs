//! Constants used throughout the screening pipeline.

/// Disclaimer attached to every classification result.
pub const DISCLAIMER: &str = "Do not use this prediction for self-diagnosis. \
You should check with your local authorities for the latest advice on seeking medical assistance.";

/// Explanation of the geographic extent scale, attached to severity results.
pub const GEO_INFO: &str = "For each lung: 0 = no involvement; 1 = <25%; \
2 = 25-50%; 3 = 50-75%; 4 = >75% involvement.";

/// Explanation of the opacity extent scale, attached to severity results.
pub const OPC_INFO: &str = "For each lung: 0 = no opacity; 1 = ground glass opacity; \
2 =consolidation; 3 = white-out.";

/// Bin width for the three-bin severity models.
pub const SEVERITY_STEP: f32 = 1.0 / 3.0;

/// Multiplier mapping the geographic severity score onto the 0-8 extent scale.
pub const GEO_EXTENT_SCALE: f32 = 8.0;

/// Multiplier mapping the opacity severity score onto the 0-6 extent scale.
pub const OPC_EXTENT_SCALE: f32 = 6.0;

/// Default spatial resolution expected by the models.
pub const DEFAULT_INPUT_SIZE: u32 = 480;

/// Default fraction of image height cropped off the top before inference.
pub const DEFAULT_TOP_PERCENT: f32 = 0.08;

/// Default name of the image input tensor.
pub const DEFAULT_INPUT_TENSOR: &str = "input_1";

/// Default name of the learning-phase flag tensor, when the graph declares one.
pub const DEFAULT_PHASE_TENSOR: &str = "keras_learning_phase";

/// Default name of the logits output tensor.
pub const DEFAULT_OUTPUT_TENSOR: &str = "MLP/dense_1/MatMul";

/// Number of classes predicted by the classifier and severity models.
pub const NUM_CLASSES: usize = 3;

/// Filename of the severity JSON written for positive predictions.
pub const SEVERITY_FILE: &str = "severity.json";

/// Filename of the rendered report PDF.
pub const REPORT_PDF_FILE: &str = "patient_analysis.pdf";

/// Filename of the templated HTML staged for PDF rendering.
pub const STAGED_HTML_FILE: &str = "specific_patient.html";
