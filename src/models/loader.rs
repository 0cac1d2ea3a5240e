//! Model bundle loader.
//!
//! Loads the ONNX model, scaler parameters and feature metadata from disk
//! and publishes them as one immutable [`ModelBundle`]. Every failure
//! degrades: a service with no artifacts on disk still starts and scores
//! through the rule-based tiers.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::ModelsConfig;
use crate::feature_extractor::FEATURE_NAMES;
use crate::models::bundle::{
    FeatureMetadata, Interpreter, InterpretationStrategy, Model, ModelBundle, Scaler,
};
use crate::models::interpret::OcclusionInterpreter;
use crate::models::onnx::OnnxModel;
use crate::models::scaler::StandardScaler;

/// Loader for the model/scaler/metadata artifact set.
pub struct ModelLoader {
    models_dir: PathBuf,
    model_file: String,
    scaler_file: String,
    metadata_file: String,
    onnx_threads: usize,
}

impl ModelLoader {
    pub fn new(config: &ModelsConfig) -> Self {
        Self {
            models_dir: PathBuf::from(&config.models_dir),
            model_file: config.model_file.clone(),
            scaler_file: config.scaler_file.clone(),
            metadata_file: config.metadata_file.clone(),
            onnx_threads: config.onnx_threads,
        }
    }

    /// Load all artifacts, degrading to an empty bundle on any failure.
    pub fn load(&self) -> ModelBundle {
        let model_path = self.models_dir.join(&self.model_file);

        if !model_path.exists() {
            info!(path = %model_path.display(), "no model file found, scoring will be rule-based");
            return ModelBundle::unavailable();
        }

        let model: Arc<dyn Model> = match OnnxModel::load(&model_path, self.onnx_threads) {
            Ok(model) => Arc::new(model),
            Err(e) => {
                warn!(error = %e, "failed to load model, scoring will be rule-based");
                return ModelBundle::unavailable();
            }
        };

        let scaler = self.load_scaler();
        let metadata = self.load_metadata();
        let interpreter = build_interpreter(&model, scaler.as_ref(), metadata.interpretation);

        info!(
            version = %metadata.version,
            scaler = scaler.is_some(),
            strategy = ?metadata.interpretation,
            "model bundle loaded"
        );

        let scaler = scaler.map(|s| Arc::new(s) as Arc<dyn Scaler>);
        ModelBundle::new(Some(model), scaler, Some(interpreter), metadata)
    }

    fn load_scaler(&self) -> Option<StandardScaler> {
        let path = self.models_dir.join(&self.scaler_file);
        if !path.exists() {
            warn!(path = %path.display(), "scaler not found, continuing without scaler");
            return None;
        }

        match read_json::<StandardScaler>(&path) {
            Ok(scaler) => {
                info!("scaler parameters loaded");
                Some(scaler)
            }
            Err(e) => {
                warn!(error = %e, "failed to read scaler parameters, continuing without scaler");
                None
            }
        }
    }

    fn load_metadata(&self) -> FeatureMetadata {
        let path = self.models_dir.join(&self.metadata_file);
        if !path.exists() {
            warn!(path = %path.display(), "feature metadata not found, using defaults");
            return FeatureMetadata::default();
        }

        match read_json::<FeatureMetadata>(&path) {
            Ok(metadata) => {
                if metadata.features.len() != FEATURE_NAMES.len() {
                    warn!(
                        expected = FEATURE_NAMES.len(),
                        found = metadata.features.len(),
                        "feature metadata length mismatch, using defaults"
                    );
                    return FeatureMetadata::default();
                }
                info!(version = %metadata.version, "feature metadata loaded");
                metadata
            }
            Err(e) => {
                warn!(error = %e, "failed to read feature metadata, using defaults");
                FeatureMetadata::default()
            }
        }
    }
}

fn build_interpreter(
    model: &Arc<dyn Model>,
    scaler: Option<&StandardScaler>,
    strategy: InterpretationStrategy,
) -> Arc<dyn Interpreter> {
    let baseline = match strategy {
        InterpretationStrategy::Tree => vec![0.0; FEATURE_NAMES.len()],
        InterpretationStrategy::Generic => scaler
            .map(|s| s.means().to_vec())
            .unwrap_or_else(|| vec![0.0; FEATURE_NAMES.len()]),
    };

    Arc::new(OcclusionInterpreter::new(model.clone(), baseline))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).context(format!("failed to read {:?}", path))?;
    serde_json::from_str(&raw).context(format!("failed to parse {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelsConfig;

    #[test]
    fn test_missing_artifacts_degrade_to_empty_bundle() {
        let config = ModelsConfig {
            models_dir: "/nonexistent/models".to_string(),
            ..ModelsConfig::default()
        };

        let bundle = ModelLoader::new(&config).load();

        assert!(!bundle.is_loaded());
        assert_eq!(bundle.version(), crate::models::bundle::MOCK_MODEL_VERSION);
    }
}
