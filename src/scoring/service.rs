//! Request-level scoring service.
//!
//! Composes tier resolution with explanation enrichment and timing. `score`
//! never fails: the resolver exhausts the degrade chain internally, and a
//! failed explanation only means no explanation is attached.

use std::sync::Arc;
use std::time::Instant;

use crate::explain::{ExplanationEngine, ExplanationResult};
use crate::models::bundle::ModelBundle;
use crate::scoring::resolver::{InferenceResolver, ScoringTier};
use crate::types::{LoanRiskRequest, ScoreResult};

pub struct ScoringService {
    bundle: Arc<ModelBundle>,
    resolver: InferenceResolver,
    explainer: ExplanationEngine,
    explanations_enabled: bool,
}

impl ScoringService {
    pub fn new(bundle: Arc<ModelBundle>, explanations_enabled: bool) -> Self {
        Self {
            bundle,
            resolver: InferenceResolver::new(),
            explainer: ExplanationEngine::new(),
            explanations_enabled,
        }
    }

    /// Score a request. Always returns a structurally valid result.
    pub fn score(&self, request: &LoanRiskRequest) -> (ScoreResult, ScoringTier) {
        let started = Instant::now();

        let (mut result, tier) = self.resolver.resolve(&self.bundle, request);

        // fallback-tier scores carry no explanation
        if self.explanations_enabled && !result.is_fallback {
            let explanation = self.explainer.explain(&self.bundle, request);
            result.top_factors = Some(explanation.top_factors);
            result.confidence_score = Some(explanation.confidence);
        }

        result.processing_time_ms = started.elapsed().as_millis() as u64;
        (result, tier)
    }

    /// Explain a request standalone; `None` when explanations are disabled.
    pub fn explain(&self, request: &LoanRiskRequest) -> Option<ExplanationResult> {
        if !self.explanations_enabled {
            return None;
        }
        Some(self.explainer.explain(&self.bundle, request))
    }

    pub fn model_version(&self) -> &str {
        self.bundle.version()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bundle::{FeatureMetadata, Model};
    use crate::types::response::FALLBACK_MODEL_VERSION;
    use crate::types::{RecommendedAction, RiskLevel};
    use anyhow::{bail, Result};

    struct BrokenModel;

    impl Model for BrokenModel {
        fn predict(&self, _features: &[f64]) -> Result<i64> {
            bail!("native failure")
        }

        fn predict_probability(&self, _features: &[f64]) -> Result<Vec<f64>> {
            bail!("native failure")
        }
    }

    fn established_request() -> LoanRiskRequest {
        let mut request = LoanRiskRequest::new("0xabc".to_string(), 1000.0, 1500.0);
        request.wallet_age_days = 365;
        request.total_transactions = 150;
        request.total_volume_usd = 50000.0;
        request.defi_interactions = 25;
        request.term_months = 3;
        request.previous_loans = 2;
        request.successful_repayments = 2;
        request.reputation_score = 75;
        request
    }

    fn rule_based_service() -> ScoringService {
        ScoringService::new(Arc::new(ModelBundle::unavailable()), true)
    }

    #[test]
    fn test_established_wallet_approves() {
        let (result, tier) = rule_based_service().score(&established_request());

        assert_eq!(tier, ScoringTier::RuleBased);
        assert!(matches!(
            result.risk_level,
            RiskLevel::VeryLow | RiskLevel::Low
        ));
        assert_eq!(result.recommended_action, RecommendedAction::Approve);
        assert!(!result.is_fallback);
        assert!(result.credit_score > 700);
    }

    #[test]
    fn test_rule_based_path_still_explains() {
        let (result, _) = rule_based_service().score(&established_request());

        let factors = result.top_factors.expect("explanation attached");
        assert!(!factors.is_empty());
        assert!(factors.len() <= 3);
        assert!(result.confidence_score.is_some());
    }

    #[test]
    fn test_disabled_explanations_attach_nothing() {
        let service = ScoringService::new(Arc::new(ModelBundle::unavailable()), false);

        let (result, _) = service.score(&established_request());

        assert!(result.top_factors.is_none());
        assert!(result.confidence_score.is_none());
        assert!(service.explain(&established_request()).is_none());
    }

    #[test]
    fn test_broken_model_degrades_without_explanation() {
        let bundle = ModelBundle::new(
            Some(std::sync::Arc::new(BrokenModel)),
            None,
            None,
            FeatureMetadata::default(),
        );
        let service = ScoringService::new(Arc::new(bundle), true);

        let (result, tier) = service.score(&established_request());

        assert_eq!(tier, ScoringTier::FallbackService);
        assert!(result.is_fallback);
        assert_eq!(result.model_version, FALLBACK_MODEL_VERSION);
        assert!(result.top_factors.is_none());
        assert!(result.risk_level >= RiskLevel::VeryLow);
        assert!(matches!(
            result.recommended_action,
            RecommendedAction::Approve
                | RecommendedAction::ApproveWithConditions
                | RecommendedAction::ManualReview
                | RecommendedAction::Reject
        ));
    }

    #[test]
    fn test_full_contract_bounds_hold() {
        let requests = [
            established_request(),
            LoanRiskRequest::new("0xnew".to_string(), 5000.0, 1000.0),
            {
                let mut r = established_request();
                r.wallet_age_days = 5;
                r.collateral_value_usd = 500.0;
                r.defaults = 2;
                r
            },
        ];

        for request in &requests {
            let (result, _) = rule_based_service().score(request);

            assert!(result.credit_score >= 100 && result.credit_score <= 1000);
            assert!(result.fraud_score >= 0.0 && result.fraud_score <= 1.0);
            assert!(result.anomaly_score >= 0.0 && result.anomaly_score <= 1.0);
            assert!(result.default_probability >= 0.0 && result.default_probability <= 1.0);
            if let Some(factors) = &result.top_factors {
                assert!(factors.len() <= 3);
            }
        }
    }
}
