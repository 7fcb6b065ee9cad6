//! Car Price Prediction Service
//!
//! Wraps a pre-trained car price regression model (ONNX artifact) behind a
//! small JSON API: validation against a fixed feature schema, encoding into
//! the exact vector the model was trained on, and a thin predictor boundary.

pub mod config;
pub mod encoder;
pub mod error;
pub mod metrics;
pub mod predictor;
pub mod schema;
pub mod server;
pub mod types;
pub mod validator;

pub use config::AppConfig;
pub use encoder::FeatureEncoder;
pub use error::ServiceError;
pub use predictor::{OnnxPredictor, Predictor};
pub use server::AppState;
pub use types::{CarFeatures, PredictionResponse, RawPredictionRequest};
pub use validator::RequestValidator;
