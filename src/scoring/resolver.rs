//! Inference tier resolution.
//!
//! Single-shot orchestration over the scoring tiers: try the model when one
//! is loaded, otherwise score rule-based; a model failure escalates straight
//! to the fallback-service policy. Fallback decisions are made on result
//! variants, not caught panics, and the resolver itself never fails.

use tracing::{debug, warn};

use crate::models::bundle::ModelBundle;
use crate::models::predictor::ModelPredictor;
use crate::scoring::fallback::FallbackScorer;
use crate::scoring::rules::RuleBasedScorer;
use crate::types::{LoanRiskRequest, ScoreResult};

/// Which tier produced a score, for logging and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringTier {
    /// Trained model ran successfully
    Model,
    /// No model loaded; rule-based prediction
    RuleBased,
    /// Model present but failed; fallback-service scoring
    FallbackService,
}

impl ScoringTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringTier::Model => "ml_model",
            ScoringTier::RuleBased => "rule_based",
            ScoringTier::FallbackService => "fallback",
        }
    }
}

/// Picks a scoring tier per request. One attempt per tier, no retries.
pub struct InferenceResolver {
    predictor: ModelPredictor,
}

impl InferenceResolver {
    pub fn new() -> Self {
        Self {
            predictor: ModelPredictor::new(),
        }
    }

    /// Resolve a request to a score. Always produces a result.
    pub fn resolve(
        &self,
        bundle: &ModelBundle,
        request: &LoanRiskRequest,
    ) -> (ScoreResult, ScoringTier) {
        if bundle.model().is_none() {
            debug!(wallet = %request.wallet_address, "no model loaded, scoring rule-based");
            return (
                RuleBasedScorer::score(request, bundle.version()),
                ScoringTier::RuleBased,
            );
        }

        match self.predictor.predict(bundle, request) {
            Ok(result) => (result, ScoringTier::Model),
            Err(e) => {
                warn!(
                    wallet = %request.wallet_address,
                    error = %e,
                    "model inference failed, using fallback scoring"
                );
                (FallbackScorer::score(request), ScoringTier::FallbackService)
            }
        }
    }
}

impl Default for InferenceResolver {
    fn default() -> Self {
        Self::new()
    }
}
