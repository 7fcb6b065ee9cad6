//! Predictor adapter over the pre-trained model artifact

pub mod loader;
pub mod onnx;

pub use loader::ArtifactLoader;
pub use onnx::OnnxPredictor;

use crate::error::Result;

/// Boundary over the external prediction capability.
///
/// The loaded artifact is an explicit, injected dependency rather than a
/// process-wide singleton, so handlers can be exercised against a stub.
/// Implementations are shared read-only across concurrent requests.
pub trait Predictor: Send + Sync {
    /// Run inference on a feature vector and return the scalar prediction
    fn predict(&self, features: &[f32]) -> Result<f64>;

    /// Length of the feature vectors this predictor expects
    fn feature_count(&self) -> usize;

    /// Model name, for logs and metadata
    fn name(&self) -> &str;
}

#[cfg(test)]
pub(crate) mod stub {
    use super::Predictor;
    use crate::error::{Result, ServiceError};
    use crate::schema;

    /// Fixed-output predictor for exercising the request pipeline in tests
    pub struct StubPredictor {
        price: f64,
        fail: bool,
    }

    impl StubPredictor {
        pub fn returning(price: f64) -> Self {
            Self { price, fail: false }
        }

        pub fn failing() -> Self {
            Self {
                price: 0.0,
                fail: true,
            }
        }
    }

    impl Predictor for StubPredictor {
        fn predict(&self, features: &[f32]) -> Result<f64> {
            if self.fail {
                return Err(ServiceError::Prediction("stub failure".into()));
            }
            if features.len() != schema::FEATURE_COUNT {
                return Err(ServiceError::Prediction(format!(
                    "expected {} features, got {}",
                    schema::FEATURE_COUNT,
                    features.len()
                )));
            }
            Ok(self.price)
        }

        fn feature_count(&self) -> usize {
            schema::FEATURE_COUNT
        }

        fn name(&self) -> &str {
            "stub"
        }
    }
}
