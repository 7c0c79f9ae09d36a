//! ONNX Runtime session management and forward-pass execution.
//!
//! A [`ModelHandle`] owns one runtime session restored from a model file.
//! Handles are created per screening call and dropped when the call
//! completes, so the session is released on every exit path by scope.

use crate::core::config::ModelConfig;
use crate::core::errors::{CxrError, CxrResult, SimpleError};
use ndarray::{Array2, ArrayView2};
use ort::logging::LogLevel;
use ort::session::Session;
use ort::value::{Tensor, TensorRef, ValueType};

/// A 4D input tensor in NHWC layout: `[batch, height, width, channels]`.
pub type Tensor4D = ndarray::Array4<f32>;

/// A loaded computation graph ready to execute forward passes.
pub struct ModelHandle {
    session: Session,
    config: ModelConfig,
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("model_name", &self.config.model_name)
            .field("model_path", &self.config.model_path)
            .field("input_name", &self.config.input_name)
            .field("output_name", &self.config.output_name)
            .finish()
    }
}

impl ModelHandle {
    /// Restores a model from disk into a fresh runtime session.
    ///
    /// Fails if the model file is missing or corrupt, or if the configured
    /// input, learning-phase, or output tensor names are not declared by
    /// the graph.
    pub fn load(config: &ModelConfig) -> CxrResult<Self> {
        let path = &config.model_path;
        if !path.exists() {
            return Err(CxrError::model_load(path, "model file not found", None));
        }

        let session = Session::builder()?
            .with_log_level(LogLevel::Error)?
            .commit_from_file(path)
            .map_err(|e| CxrError::model_load(path, "failed to create ONNX session", Some(e)))?;

        let handle = Self {
            session,
            config: config.clone(),
        };
        handle.validate_tensor_names()?;
        Ok(handle)
    }

    /// Returns the model name associated with this handle.
    pub fn model_name(&self) -> &str {
        &self.config.model_name
    }

    fn validate_tensor_names(&self) -> CxrResult<()> {
        let has_input = |name: &str| self.session.inputs.iter().any(|i| i.name == name);

        if !has_input(&self.config.input_name) {
            return Err(CxrError::model_load(
                &self.config.model_path,
                format!(
                    "graph declares no input tensor named '{}'",
                    self.config.input_name
                ),
                None,
            ));
        }
        if let Some(phase) = &self.config.phase_input_name {
            if !has_input(phase) {
                return Err(CxrError::model_load(
                    &self.config.model_path,
                    format!("graph declares no learning-phase tensor named '{phase}'"),
                    None,
                ));
            }
        }
        if !self
            .session
            .outputs
            .iter()
            .any(|o| o.name == self.config.output_name)
        {
            return Err(CxrError::model_load(
                &self.config.model_path,
                format!(
                    "graph declares no output tensor named '{}'",
                    self.config.output_name
                ),
                None,
            ));
        }
        Ok(())
    }

    /// Returns the declared shape of the image input tensor, if static.
    ///
    /// Dynamic dimensions (e.g. -1) are returned as-is.
    fn declared_input_shape(&self) -> Option<Vec<i64>> {
        let input = self
            .session
            .inputs
            .iter()
            .find(|i| i.name == self.config.input_name)?;
        match &input.input_type {
            ValueType::Tensor { shape, .. } => Some(shape.iter().copied().collect()),
            _ => None,
        }
    }

    fn validate_input_shape(&self, x: &Tensor4D) -> CxrResult<()> {
        let Some(declared) = self.declared_input_shape() else {
            return Ok(());
        };
        let actual = x.shape();
        let matches = declared.len() == actual.len()
            && declared
                .iter()
                .zip(actual)
                .all(|(&d, &a)| d <= 0 || d as usize == a);
        if !matches {
            return Err(CxrError::inference(
                &self.config.model_name,
                format!("input tensor shape {actual:?} does not match graph input {declared:?}"),
                SimpleError::new("input shape mismatch"),
            ));
        }
        Ok(())
    }

    /// Executes one forward pass and returns the raw logits as
    /// `[batch, classes]`.
    ///
    /// The input must match the graph's declared shape; a mismatch is an
    /// inference error and is fatal to the current request (no retries).
    pub fn infer_logits(&mut self, x: &Tensor4D) -> CxrResult<Array2<f32>> {
        self.validate_input_shape(x)?;

        let input_shape = x.shape().to_vec();
        let model_name = self.config.model_name.clone();

        let image_tensor = TensorRef::from_array_view(x.view()).map_err(|e| {
            CxrError::inference(
                &model_name,
                format!("failed to convert input tensor with shape {input_shape:?}"),
                e,
            )
        })?;

        let outputs = if let Some(phase) = &self.config.phase_input_name {
            // Inference only: the learning-phase flag is always false.
            let phase_tensor = Tensor::from_array(([1usize], vec![false]))?;
            self.session.run(ort::inputs![
                self.config.input_name.as_str() => image_tensor,
                phase.as_str() => phase_tensor
            ])
        } else {
            self.session
                .run(ort::inputs![self.config.input_name.as_str() => image_tensor])
        }
        .map_err(|e| {
            CxrError::inference(
                &model_name,
                format!(
                    "forward pass failed with input '{}' -> output '{}'",
                    self.config.input_name, self.config.output_name
                ),
                e,
            )
        })?;

        let (output_shape, output_data) = outputs[self.config.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                CxrError::inference(
                    &model_name,
                    format!(
                        "failed to extract output tensor '{}' as f32",
                        self.config.output_name
                    ),
                    e,
                )
            })?;

        if output_shape.len() != 2 {
            return Err(CxrError::inference(
                &model_name,
                format!(
                    "expected 2D logits, got {}D with shape {:?}",
                    output_shape.len(),
                    output_shape
                ),
                SimpleError::new("invalid output tensor dimensions"),
            ));
        }

        let batch = output_shape[0] as usize;
        let classes = output_shape[1] as usize;
        if output_data.len() != batch * classes {
            return Err(CxrError::inference(
                &model_name,
                format!(
                    "output data size mismatch: expected {}, got {}",
                    batch * classes,
                    output_data.len()
                ),
                SimpleError::new("output tensor data size mismatch"),
            ));
        }

        let logits = ArrayView2::from_shape((batch, classes), output_data)
            .map_err(CxrError::Tensor)?
            .to_owned();
        Ok(logits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ModelConfig;

    #[test]
    fn load_fails_for_missing_model_file() {
        let config = ModelConfig::new("does/not/exist.onnx", "missing");
        let result = ModelHandle::load(&config);
        assert!(matches!(result, Err(CxrError::ModelLoad { .. })));
    }
}
