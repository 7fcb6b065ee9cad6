//! Car Price Prediction Service - Main Entry Point
//!
//! Loads the model artifact once at startup, then serves predictions over
//! HTTP. Requests are independent pure functions of their input; the only
//! shared resource is the read-only loaded model.

use anyhow::{Context, Result};
use car_price_service::{
    config::AppConfig,
    metrics::{MetricsReporter, RequestMetrics},
    predictor::{OnnxPredictor, Predictor},
    server::{self, AppState},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("car_price_service=info".parse()?),
        )
        .init();

    info!("Starting car price prediction service");

    // Load configuration
    let config = AppConfig::load()?;
    info!(
        model_path = %config.model.path,
        reference_year = config.features.reference_year,
        vintage_age_years = config.features.vintage_age_years,
        "Configuration loaded"
    );

    // Initialize metrics
    let metrics = Arc::new(RequestMetrics::new());

    // Load the model artifact. A missing or incompatible artifact is fatal;
    // serving must not start without it.
    let predictor = OnnxPredictor::from_artifact(
        &config.model.path,
        &config.model.name,
        config.model.onnx_threads,
    )
    .context("failed to load model artifact")?;
    info!(
        model = %config.model.name,
        features = predictor.feature_count(),
        "Model artifact ready"
    );

    let state = AppState::new(
        Arc::new(predictor),
        config.features,
        &config.model,
        metrics.clone(),
    );
    state.mark_ready();

    // Start metrics reporter (logs a summary every 60 seconds)
    tokio::spawn(async move {
        let reporter = MetricsReporter::new(metrics, 60);
        reporter.start().await;
    });

    let app = server::router(state);
    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_address)
        .await
        .context(format!("failed to bind {bind_address}"))?;
    info!(addr = %bind_address, "Listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
