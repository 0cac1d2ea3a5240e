//! Score explanations: attribution-based with a rule-based safety net.

pub mod model_based;
pub mod rule_based;

use tracing::{debug, warn};

use crate::models::bundle::ModelBundle;
use crate::types::{FactorExplanation, LoanRiskRequest};

/// Top contributing factors plus a confidence estimate.
#[derive(Debug, Clone)]
pub struct ExplanationResult {
    /// At most three factors, strongest contribution first
    pub top_factors: Vec<FactorExplanation>,
    /// Confidence in the explanation, in [0, 1]
    pub confidence: f64,
}

/// Resolves which explanation path to use.
///
/// The attribution path runs when the bundle carries both a model and an
/// interpreter; any failure there degrades to the rule-based ranking. This
/// resolver never errors.
pub struct ExplanationEngine;

impl ExplanationEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn explain(&self, bundle: &ModelBundle, request: &LoanRiskRequest) -> ExplanationResult {
        if bundle.interpreter().is_some() && bundle.model().is_some() {
            match model_based::explain(bundle, request) {
                Ok(result) => {
                    debug!(
                        wallet = %request.wallet_address,
                        factors = result.top_factors.len(),
                        "attribution explanation complete"
                    );
                    return result;
                }
                Err(e) => {
                    warn!(error = %e, "attribution explanation failed, using rule-based factors");
                }
            }
        }

        rule_based::explain(request)
    }
}

impl Default for ExplanationEngine {
    fn default() -> Self {
        Self::new()
    }
}
