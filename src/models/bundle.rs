//! Model bundle: the immutable snapshot of trained-model capabilities.
//!
//! The loader publishes one bundle at startup; scoring reads it without
//! locks. Every capability is optional: an empty bundle is valid and routes
//! all requests to the rule-based tiers.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::feature_extractor::FEATURE_NAMES;

/// Version tag reported when no trained artifacts could be loaded
pub const MOCK_MODEL_VERSION: &str = "v1.0.0-mock";

/// A trained binary classifier over the 12-feature vector.
///
/// Any call may fail; the caller treats a failure as a signal to degrade,
/// never as a reason to error out.
pub trait Model: Send + Sync {
    /// Predicted class label (0 = repay, 1 = default)
    fn predict(&self, features: &[f64]) -> Result<i64>;

    /// Class probabilities `[p_repay, p_default]`
    fn predict_probability(&self, features: &[f64]) -> Result<Vec<f64>>;
}

/// Feature normalization fitted alongside the model.
pub trait Scaler: Send + Sync {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>>;
}

/// Per-feature attribution over a (scaled) feature vector.
///
/// Returns one contribution row per output class so callers can select the
/// positive class for binary models.
pub trait Interpreter: Send + Sync {
    fn attribute(&self, features: &[f64]) -> Result<Vec<Vec<f64>>>;
}

/// Attribution strategy the bundle declares for its model, resolved once at
/// load time rather than re-detected per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpretationStrategy {
    /// Tree ensembles; attribution measured against a zero baseline
    Tree,
    /// Opaque models; attribution measured against a feature-means baseline
    #[default]
    Generic,
}

/// Metadata describing the features the model was trained on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureMetadata {
    /// Ordered feature names the model was fit on
    pub features: Vec<String>,

    /// Model version tag threaded into every result
    pub version: String,

    /// Evaluation AUC from training, if recorded
    #[serde(default)]
    pub auc: Option<f64>,

    /// When the artifacts were last refreshed
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,

    /// Declared attribution strategy
    #[serde(default)]
    pub interpretation: InterpretationStrategy,
}

impl Default for FeatureMetadata {
    fn default() -> Self {
        Self {
            features: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            version: MOCK_MODEL_VERSION.to_string(),
            auc: None,
            last_updated: None,
            interpretation: InterpretationStrategy::default(),
        }
    }
}

/// Published snapshot of model, scaler, interpreter and feature metadata.
pub struct ModelBundle {
    model: Option<Arc<dyn Model>>,
    scaler: Option<Arc<dyn Scaler>>,
    interpreter: Option<Arc<dyn Interpreter>>,
    metadata: FeatureMetadata,
}

impl ModelBundle {
    /// Bundle with every capability present.
    pub fn new(
        model: Option<Arc<dyn Model>>,
        scaler: Option<Arc<dyn Scaler>>,
        interpreter: Option<Arc<dyn Interpreter>>,
        metadata: FeatureMetadata,
    ) -> Self {
        Self {
            model,
            scaler,
            interpreter,
            metadata,
        }
    }

    /// Bundle with no trained artifacts; scoring runs entirely rule-based.
    pub fn unavailable() -> Self {
        Self {
            model: None,
            scaler: None,
            interpreter: None,
            metadata: FeatureMetadata::default(),
        }
    }

    pub fn model(&self) -> Option<&Arc<dyn Model>> {
        self.model.as_ref()
    }

    pub fn scaler(&self) -> Option<&Arc<dyn Scaler>> {
        self.scaler.as_ref()
    }

    pub fn interpreter(&self) -> Option<&Arc<dyn Interpreter>> {
        self.interpreter.as_ref()
    }

    pub fn metadata(&self) -> &FeatureMetadata {
        &self.metadata
    }

    pub fn version(&self) -> &str {
        &self.metadata.version
    }

    pub fn feature_names(&self) -> &[String] {
        &self.metadata.features
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_bundle() {
        let bundle = ModelBundle::unavailable();

        assert!(!bundle.is_loaded());
        assert!(bundle.model().is_none());
        assert!(bundle.scaler().is_none());
        assert!(bundle.interpreter().is_none());
        assert_eq!(bundle.version(), MOCK_MODEL_VERSION);
        assert_eq!(bundle.feature_names().len(), 12);
    }

    #[test]
    fn test_default_metadata_matches_extractor_order() {
        let metadata = FeatureMetadata::default();
        assert_eq!(metadata.features.len(), FEATURE_NAMES.len());
        for (name, expected) in metadata.features.iter().zip(FEATURE_NAMES.iter()) {
            assert_eq!(name, expected);
        }
    }

    #[test]
    fn test_metadata_deserialization() {
        let json = r#"{
            "features": ["wallet_age_days", "total_transactions"],
            "version": "v2.1.0",
            "auc": 0.87,
            "interpretation": "tree"
        }"#;

        let metadata: FeatureMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(metadata.version, "v2.1.0");
        assert_eq!(metadata.auc, Some(0.87));
        assert_eq!(metadata.interpretation, InterpretationStrategy::Tree);
        assert!(metadata.last_updated.is_none());
    }
}
