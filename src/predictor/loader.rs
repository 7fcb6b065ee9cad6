//! ONNX artifact loader

use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use tracing::info;

/// A loaded ONNX artifact with its resolved input/output names
#[derive(Debug)]
pub struct LoadedArtifact {
    /// ONNX Runtime session
    pub session: Session,
    /// Input name for the model
    pub input_name: String,
    /// Output name for the predicted value
    pub output_name: String,
}

/// Loader for the serialized model artifact.
///
/// Loading happens once at process start; a missing or unreadable artifact
/// is a startup failure, not something to limp past.
pub struct ArtifactLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ArtifactLoader {
    /// Create a loader with default settings (1 thread)
    pub fn new() -> Result<Self> {
        Self::with_threads(1)
    }

    /// Create a loader with the given ONNX intra-op thread count
    pub fn with_threads(onnx_threads: usize) -> Result<Self> {
        ort::init().commit()?;
        info!(onnx_threads = onnx_threads, "ONNX Runtime initialized");
        Ok(Self { onnx_threads })
    }

    /// Load the artifact from file
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<LoadedArtifact> {
        let path = path.as_ref();

        if !path.exists() {
            anyhow::bail!("model artifact not found at {}", path.display());
        }

        info!(path = %path.display(), threads = self.onnx_threads, "Loading model artifact");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.onnx_threads)?
            .commit_from_file(path)
            .context(format!("Failed to load model artifact from {path:?}"))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .unwrap_or_else(|| "variable".to_string());

        info!(
            input = %input_name,
            output = %output_name,
            "Model artifact loaded"
        );

        Ok(LoadedArtifact {
            session,
            input_name,
            output_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_artifact_fails_fast() {
        let loader = ArtifactLoader::new().unwrap();
        let err = loader.load("does/not/exist.onnx").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
