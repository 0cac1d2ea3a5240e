//! Configuration management for the credit scoring pipeline

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub nats: NatsConfig,
    pub models: ModelsConfig,
    pub scoring: ScoringConfig,
    pub pipeline: PipelineConfig,
    pub logging: LoggingConfig,
}

/// NATS connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NatsConfig {
    /// NATS server URL
    pub url: String,
    /// Subject for incoming scoring requests
    pub request_subject: String,
    /// Subject for outgoing score events
    pub score_subject: String,
}

/// Model artifact configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    /// Directory containing model artifacts
    pub models_dir: String,
    /// ONNX model file name
    #[serde(default = "default_model_file")]
    pub model_file: String,
    /// Scaler parameter file name
    #[serde(default = "default_scaler_file")]
    pub scaler_file: String,
    /// Feature metadata file name
    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,
    /// Number of threads for ONNX inference (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

fn default_model_file() -> String {
    "credit_model.onnx".to_string()
}

fn default_scaler_file() -> String {
    "scaler.json".to_string()
}

fn default_metadata_file() -> String {
    "feature_config.json".to_string()
}

fn default_onnx_threads() -> usize {
    1
}

/// Scoring behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Attach factor explanations to non-fallback scores
    #[serde(default = "default_enable_explanations")]
    pub enable_explanations: bool,
}

fn default_enable_explanations() -> bool {
    true
}

/// Pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Number of worker tasks
    pub workers: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
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
            nats: NatsConfig {
                url: "nats://localhost:4222".to_string(),
                request_subject: "credit.requests".to_string(),
                score_subject: "credit.scores".to_string(),
            },
            models: ModelsConfig::default(),
            scoring: ScoringConfig {
                enable_explanations: true,
            },
            pipeline: PipelineConfig { workers: 4 },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "json".to_string(),
            },
        }
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            models_dir: "models".to_string(),
            model_file: default_model_file(),
            scaler_file: default_scaler_file(),
            metadata_file: default_metadata_file(),
            onnx_threads: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.nats.url, "nats://localhost:4222");
        assert_eq!(config.nats.request_subject, "credit.requests");
        assert!(config.scoring.enable_explanations);
        assert_eq!(config.models.model_file, "credit_model.onnx");
        assert_eq!(config.pipeline.workers, 4);
    }
}
