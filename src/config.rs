//! Configuration management for the car price prediction service

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub features: FeatureConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
}

/// Model artifact configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the serialized ONNX artifact
    pub path: String,
    /// Model name reported by the metadata endpoint
    pub name: String,
    /// Model version reported by the metadata endpoint
    pub version: String,
    /// Number of threads for ONNX inference (default: 1)
    pub onnx_threads: usize,
}

/// Derived-feature configuration.
///
/// The thresholds are author convention from the training pipeline, not a
/// documented contract, so they are configuration rather than fixed logic.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Reference year for the derived age feature
    pub reference_year: i32,
    /// Minimum age (in years) for the vintage flag
    pub vintage_age_years: i32,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl AppConfig {
    /// Load configuration from the default file location.
    ///
    /// A missing file yields the defaults; a malformed file is an error.
    /// `MODEL_PATH` in the environment overrides the artifact path.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from_path("config/config.toml")?;
        if let Ok(path) = std::env::var("MODEL_PATH") {
            config.model.path = path;
        }
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            model: ModelConfig::default(),
            features: FeatureConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: "models/car_price.onnx".to_string(),
            name: "car-price".to_string(),
            version: "1.0.0".to_string(),
            onnx_threads: 1,
        }
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            reference_year: 2025,
            vintage_age_years: 20,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.model.path, "models/car_price.onnx");
        assert_eq!(config.features.reference_year, 2025);
        assert_eq!(config.features.vintage_age_years, 20);
        assert_eq!(config.model.onnx_threads, 1);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_from_path("does/not/exist.toml").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.level, "info");
    }
}
