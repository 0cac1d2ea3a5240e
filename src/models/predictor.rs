//! Model-backed prediction.

use anyhow::{Context, Result};
use tracing::debug;

use crate::feature_extractor::FeatureExtractor;
use crate::models::bundle::ModelBundle;
use crate::models::onnx::default_probability;
use crate::scoring::formatter;
use crate::types::{LoanRiskRequest, ScoreResult};

/// Runs the trained model over an extracted feature vector and formats the
/// output into the standard response shape.
///
/// Any failure along the way (scaler mismatch, native failure) is returned
/// to the caller, which treats it as a signal to fall back.
pub struct ModelPredictor {
    extractor: FeatureExtractor,
}

impl ModelPredictor {
    pub fn new() -> Self {
        Self {
            extractor: FeatureExtractor::new(),
        }
    }

    /// Predict with the bundle's model capability.
    ///
    /// Fails if the capability is absent or any step errors; never panics.
    pub fn predict(&self, bundle: &ModelBundle, request: &LoanRiskRequest) -> Result<ScoreResult> {
        let model = bundle.model().context("model capability absent")?;

        let mut features = self.extractor.extract(request);

        if let Some(scaler) = bundle.scaler() {
            features = scaler.transform(&features).context("scaler transform failed")?;
        }

        let label = model.predict(&features).context("model predict failed")?;
        let probabilities = model
            .predict_probability(&features)
            .context("model predict_probability failed")?;

        let probability = default_probability(&probabilities);
        debug!(
            wallet = %request.wallet_address,
            label = label,
            default_probability = probability,
            "model inference complete"
        );

        Ok(formatter::score_from_probability(
            request,
            probability,
            bundle.version(),
        ))
    }
}

impl Default for ModelPredictor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bundle::{FeatureMetadata, Model, Scaler};
    use anyhow::bail;
    use std::sync::Arc;

    struct FixedModel {
        probability: f64,
    }

    impl Model for FixedModel {
        fn predict(&self, _features: &[f64]) -> Result<i64> {
            Ok(if self.probability >= 0.5 { 1 } else { 0 })
        }

        fn predict_probability(&self, _features: &[f64]) -> Result<Vec<f64>> {
            Ok(vec![1.0 - self.probability, self.probability])
        }
    }

    struct BrokenModel;

    impl Model for BrokenModel {
        fn predict(&self, _features: &[f64]) -> Result<i64> {
            bail!("native failure")
        }

        fn predict_probability(&self, _features: &[f64]) -> Result<Vec<f64>> {
            bail!("native failure")
        }
    }

    struct BrokenScaler;

    impl Scaler for BrokenScaler {
        fn transform(&self, _features: &[f64]) -> Result<Vec<f64>> {
            bail!("fitted on 36 features, got 12")
        }
    }

    fn sample_request() -> LoanRiskRequest {
        let mut request = LoanRiskRequest::new("0xabc".to_string(), 1000.0, 1500.0);
        request.wallet_age_days = 365;
        request.total_transactions = 150;
        request.total_volume_usd = 50000.0;
        request.reputation_score = 75;
        request
    }

    fn bundle_with(model: Arc<dyn Model>) -> ModelBundle {
        let metadata = FeatureMetadata {
            version: "v2.0.0".to_string(),
            ..FeatureMetadata::default()
        };
        ModelBundle::new(Some(model), None, None, metadata)
    }

    #[test]
    fn test_predict_formats_model_output() {
        let predictor = ModelPredictor::new();
        let bundle = bundle_with(Arc::new(FixedModel { probability: 0.05 }));

        let result = predictor.predict(&bundle, &sample_request()).unwrap();

        assert_eq!(result.credit_score, 955);
        assert!(!result.is_fallback);
        assert_eq!(result.model_version, "v2.0.0");
    }

    #[test]
    fn test_absent_model_is_an_error() {
        let predictor = ModelPredictor::new();
        let bundle = ModelBundle::unavailable();

        assert!(predictor.predict(&bundle, &sample_request()).is_err());
    }

    #[test]
    fn test_model_failure_propagates() {
        let predictor = ModelPredictor::new();
        let bundle = bundle_with(Arc::new(BrokenModel));

        assert!(predictor.predict(&bundle, &sample_request()).is_err());
    }

    #[test]
    fn test_scaler_failure_propagates() {
        let predictor = ModelPredictor::new();
        let metadata = FeatureMetadata::default();
        let bundle = ModelBundle::new(
            Some(Arc::new(FixedModel { probability: 0.05 })),
            Some(Arc::new(BrokenScaler)),
            None,
            metadata,
        );

        assert!(predictor.predict(&bundle, &sample_request()).is_err());
    }
}
