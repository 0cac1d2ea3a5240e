//! Rule-based explanation path.
//!
//! Ranks hand-weighted candidate factors; always available, used whenever
//! the attribution path cannot run. The weights are an independent heuristic
//! mirroring the rule-based scorer's intuition, not its exact arithmetic.

use crate::explain::ExplanationResult;
use crate::types::{FactorExplanation, FactorImpact, LoanRiskRequest};

/// Rank candidate factors and return the strongest three.
pub fn explain(request: &LoanRiskRequest) -> ExplanationResult {
    let mut factors = candidate_factors(request);

    factors.sort_by(|a, b| b.contribution.total_cmp(&a.contribution));
    factors.truncate(3);

    ExplanationResult {
        top_factors: factors,
        confidence: confidence(request),
    }
}

fn candidate_factors(request: &LoanRiskRequest) -> Vec<FactorExplanation> {
    let mut factors = Vec::with_capacity(6);

    factors.push(FactorExplanation {
        feature: "reputation_score".to_string(),
        impact: if request.reputation_score >= 50 {
            FactorImpact::Positive
        } else {
            FactorImpact::Negative
        },
        value: request.reputation_score as f64,
        contribution: (request.reputation_score as f64 - 50.0).abs() / 100.0 * 0.3,
    });

    factors.push(FactorExplanation {
        feature: "wallet_age_days".to_string(),
        impact: if request.wallet_age_days >= 90 {
            FactorImpact::Positive
        } else {
            FactorImpact::Negative
        },
        value: request.wallet_age_days as f64,
        contribution: (request.wallet_age_days as f64 / 365.0 * 0.25).min(0.25),
    });

    let collateral_ratio = request.collateral_ratio();
    factors.push(FactorExplanation {
        feature: "collateral_ratio".to_string(),
        impact: if collateral_ratio >= 1.0 {
            FactorImpact::Positive
        } else {
            FactorImpact::Negative
        },
        value: collateral_ratio,
        contribution: (collateral_ratio * 0.2).min(0.3),
    });

    if request.successful_repayments > 0 {
        factors.push(FactorExplanation {
            feature: "successful_repayments".to_string(),
            impact: FactorImpact::Positive,
            value: request.successful_repayments as f64,
            contribution: (request.successful_repayments as f64 * 0.1).min(0.2),
        });
    }

    if request.defaults > 0 {
        factors.push(FactorExplanation {
            feature: "defaults".to_string(),
            impact: FactorImpact::Negative,
            value: request.defaults as f64,
            contribution: (request.defaults as f64 * 0.3).min(0.5),
        });
    }

    factors.push(FactorExplanation {
        feature: "defi_interactions".to_string(),
        impact: if request.defi_interactions >= 10 {
            FactorImpact::Positive
        } else {
            FactorImpact::Neutral
        },
        value: request.defi_interactions as f64,
        contribution: (request.defi_interactions as f64 / 50.0 * 0.15).min(0.15),
    });

    factors
}

fn confidence(request: &LoanRiskRequest) -> f64 {
    let mut confidence: f64 = 0.5;

    if request.wallet_age_days > 180 {
        confidence += 0.15;
    }
    if request.total_transactions > 50 {
        confidence += 0.1;
    }
    if request.previous_loans > 0 {
        confidence += 0.15;
    }
    if request.collateral_value_usd >= request.loan_amount {
        confidence += 0.1;
    }

    confidence.min(0.99)
}
