//! ONNX-backed predictor

use crate::error::{Result, ServiceError};
use crate::predictor::loader::{ArtifactLoader, LoadedArtifact};
use crate::predictor::Predictor;
use crate::schema;
use ort::value::Tensor;
use std::path::Path;
use std::sync::RwLock;
use tracing::debug;

/// Predictor backed by the loaded ONNX regression session.
///
/// The session is behind an `RwLock` because ONNX Runtime inference takes
/// `&mut`; the lock is the only synchronization in the request path.
pub struct OnnxPredictor {
    name: String,
    session: RwLock<ort::session::Session>,
    input_name: String,
    output_name: String,
}

impl OnnxPredictor {
    /// Load the artifact at `path` and wrap it as a predictor.
    ///
    /// Fails fast when the artifact is missing or unreadable.
    pub fn from_artifact<P: AsRef<Path>>(
        path: P,
        name: &str,
        onnx_threads: usize,
    ) -> anyhow::Result<Self> {
        let loader = ArtifactLoader::with_threads(onnx_threads)?;
        let LoadedArtifact {
            session,
            input_name,
            output_name,
        } = loader.load(path)?;

        Ok(Self {
            name: name.to_string(),
            session: RwLock::new(session),
            input_name,
            output_name,
        })
    }

    /// Extract the predicted scalar from the session outputs.
    ///
    /// The regressor emits a `[1, 1]` (or `[1]`) float tensor; fall back to
    /// scanning all outputs in case the export named them differently.
    fn extract_prediction(&self, outputs: &ort::session::SessionOutputs) -> Result<f64> {
        if let Some(output) = outputs.get(self.output_name.as_str()) {
            if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
                if let Some(&value) = data.first() {
                    return Ok(f64::from(value));
                }
            }
        }

        for (name, output) in outputs.iter() {
            if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
                if let Some(&value) = data.first() {
                    debug!(output = %name, "Extracted prediction from fallback output");
                    return Ok(f64::from(value));
                }
            }
        }

        Err(ServiceError::Prediction(
            "no float tensor output in model response".to_string(),
        ))
    }
}

impl Predictor for OnnxPredictor {
    fn predict(&self, features: &[f32]) -> Result<f64> {
        if features.len() != schema::FEATURE_COUNT {
            return Err(ServiceError::Prediction(format!(
                "feature vector length {} does not match model input {}",
                features.len(),
                schema::FEATURE_COUNT
            )));
        }

        let shape = vec![1_i64, features.len() as i64];
        let input_tensor = Tensor::from_array((shape, features.to_vec()))
            .map_err(|e| ServiceError::Prediction(format!("failed to build input tensor: {e}")))?;

        let mut session = self
            .session
            .write()
            .map_err(|e| ServiceError::Prediction(format!("session lock poisoned: {e}")))?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_tensor])
            .map_err(|e| ServiceError::Prediction(format!("inference failed: {e}")))?;

        let prediction = self.extract_prediction(&outputs)?;

        if !prediction.is_finite() {
            return Err(ServiceError::Prediction(format!(
                "model returned non-finite value {prediction}"
            )));
        }

        debug!(model = %self.name, prediction = prediction, "Inference complete");
        Ok(prediction)
    }

    fn feature_count(&self) -> usize {
        schema::FEATURE_COUNT
    }

    fn name(&self) -> &str {
        &self.name
    }
}
