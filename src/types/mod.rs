//! Request and response contracts for the prediction API

pub mod request;
pub mod response;

pub use request::{CarFeatures, RawPredictionRequest};
pub use response::PredictionResponse;
