//! HTTP surface for the prediction service.
//!
//! One linear pass per request: validator → encoder → predictor → formatter,
//! short-circuiting at the first failing stage. All shared state is
//! read-only; the readiness flag is set once and never cleared.

use crate::config::{FeatureConfig, ModelConfig};
use crate::encoder::FeatureEncoder;
use crate::error::ServiceError;
use crate::metrics::RequestMetrics;
use crate::predictor::Predictor;
use crate::schema;
use crate::types::request::RawPredictionRequest;
use crate::types::response::{
    ErrorResponse, HealthResponse, MetadataResponse, PredictionResponse, ReadinessResponse,
};
use crate::validator::RequestValidator;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Shared application state, cloned into every handler
#[derive(Clone)]
pub struct AppState {
    predictor: Arc<dyn Predictor>,
    validator: Arc<RequestValidator>,
    encoder: Arc<FeatureEncoder>,
    metrics: Arc<RequestMetrics>,
    ready: Arc<AtomicBool>,
    model_name: String,
    model_version: String,
}

impl AppState {
    pub fn new(
        predictor: Arc<dyn Predictor>,
        features: FeatureConfig,
        model: &ModelConfig,
        metrics: Arc<RequestMetrics>,
    ) -> Self {
        Self {
            predictor,
            validator: Arc::new(RequestValidator::new(features.reference_year)),
            encoder: Arc::new(FeatureEncoder::new(
                features.reference_year,
                features.vintage_age_years,
            )),
            metrics,
            ready: Arc::new(AtomicBool::new(false)),
            model_name: model.name.clone(),
            model_version: model.version.clone(),
        }
    }

    /// Mark the artifact as loaded. Readiness never flips back.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/metadata", get(metadata))
        .route("/stats", get(stats))
        .route("/predict", post(predict))
        .with_state(state)
}

/// Liveness: static OK, no dependencies consulted
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Readiness: whether the model artifact finished loading
async fn ready(State(state): State<AppState>) -> Response {
    if state.is_ready() {
        (StatusCode::OK, Json(ReadinessResponse::ready())).into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse::not_ready("model artifact not loaded")),
        )
            .into_response()
    }
}

/// Accepted feature names, types, and categorical values
async fn metadata(State(state): State<AppState>) -> Json<MetadataResponse> {
    let reference_year = state.encoder.reference_year();

    Json(MetadataResponse {
        model: state.model_name.clone(),
        version: state.model_version.clone(),
        feature_count: state.encoder.feature_count(),
        features: schema::field_specs(reference_year),
        models_by_manufacturer: BTreeMap::from(schema::MODELS_BY_MANUFACTURER.map(
            |(manufacturer, models)| (manufacturer, models.to_vec()),
        )),
        engine_size_options: schema::ENGINE_SIZE_OPTIONS.to_vec(),
        mileage_options: schema::MILEAGE_OPTIONS.to_vec(),
        years: (schema::MIN_YEAR..=reference_year).rev().collect(),
    })
}

/// Request-processing statistics
async fn stats(State(state): State<AppState>) -> Response {
    Json(state.metrics.snapshot()).into_response()
}

/// Full prediction pipeline
async fn predict(
    State(state): State<AppState>,
    Json(raw): Json<RawPredictionRequest>,
) -> Result<Json<PredictionResponse>, ServiceError> {
    let start = Instant::now();
    state.metrics.record_request();

    if !state.is_ready() {
        state.metrics.record_not_ready();
        return Err(ServiceError::ModelUnavailable(
            "model artifact has not finished loading".to_string(),
        ));
    }

    let car = state.validator.validate(&raw).map_err(|issues| {
        state.metrics.record_validation_failure();
        warn!(
            failed_fields = issues.len(),
            fields = ?issues.iter().map(|i| i.field.as_str()).collect::<Vec<_>>(),
            "Request failed validation"
        );
        ServiceError::Validation(issues)
    })?;

    let features = state.encoder.encode(&car).map_err(|e| {
        state.metrics.record_validation_failure();
        warn!(error = %e, "Encoding rejected request");
        e
    })?;

    // ONNX inference is synchronous; keep it off the async workers.
    let predictor = Arc::clone(&state.predictor);
    let result = match tokio::task::spawn_blocking(move || predictor.predict(&features)).await {
        Ok(result) => result,
        Err(e) => Err(ServiceError::Prediction(format!(
            "inference task failed: {e}"
        ))),
    };

    match result {
        Ok(price) => {
            let elapsed = start.elapsed();
            state.metrics.record_prediction(elapsed, price);
            info!(
                manufacturer = %car.manufacturer,
                model = %car.model,
                predicted_price_gbp = price,
                processing_time_us = elapsed.as_micros() as u64,
                "Prediction served"
            );
            Ok(Json(PredictionResponse::from_price(price)))
        }
        Err(e) => {
            state.metrics.record_prediction_failure();
            error!(error = %e, "Prediction failed");
            Err(e)
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = match self {
            ServiceError::Validation(issues) => {
                ErrorResponse::new("validation failed").with_fields(issues)
            }
            ServiceError::ModelUnavailable(reason) => {
                ErrorResponse::new(format!("model not available: {reason}"))
            }
            // Internal detail stays in the logs.
            ServiceError::Prediction(_) => ErrorResponse::new("prediction failed"),
            ServiceError::Artifact(_) | ServiceError::Config(_) => {
                ErrorResponse::new("internal error")
            }
        };

        (status, Json(body)).into_response()
    }
}
