//! Fallback-service scoring policy.
//!
//! The last tier of the degrade chain, used when the model-backed path fails
//! outright. Stricter than the rule-based prediction policy: coarse buckets,
//! heavier default penalties, its own fraud heuristic, a fixed version tag
//! and `is_fallback` always set. The two policies are invoked from different
//! failure points and must stay distinct.

use tracing::info;

use crate::types::response::FALLBACK_MODEL_VERSION;
use crate::types::{LoanRiskRequest, RecommendedAction, RiskLevel, ScoreResult};

/// Safety-net scorer guaranteed to produce a structurally valid response.
pub struct FallbackScorer;

impl FallbackScorer {
    /// Score a request with the coarse bucket rules.
    pub fn score(request: &LoanRiskRequest) -> ScoreResult {
        info!("using fallback rule-based scoring");

        let collateral_ratio = request.collateral_ratio();

        let mut score: i64 = 500;

        score += if request.wallet_age_days >= 365 {
            150
        } else if request.wallet_age_days >= 180 {
            100
        } else if request.wallet_age_days >= 90 {
            50
        } else if request.wallet_age_days >= 30 {
            25
        } else {
            -50
        };

        score += if request.reputation_score >= 80 {
            150
        } else if request.reputation_score >= 60 {
            75
        } else if request.reputation_score >= 40 {
            0
        } else {
            -100
        };

        score += if collateral_ratio >= 2.0 {
            100
        } else if collateral_ratio >= 1.5 {
            75
        } else if collateral_ratio >= 1.0 {
            25
        } else {
            -100
        };

        if request.previous_loans > 0 && request.defaults == 0 {
            score += 50 * request.successful_repayments.min(3) as i64;
        }

        score -= request.defaults as i64 * 150;

        let credit_score = score.clamp(100, 1000) as u32;

        let (risk_level, default_probability, interest_rate) = if credit_score >= 800 {
            (RiskLevel::VeryLow, 0.02, 5.0)
        } else if credit_score >= 700 {
            (RiskLevel::Low, 0.05, 7.5)
        } else if credit_score >= 600 {
            (RiskLevel::Medium, 0.12, 10.0)
        } else if credit_score >= 500 {
            (RiskLevel::High, 0.22, 15.0)
        } else {
            (RiskLevel::VeryHigh, 0.40, 20.0)
        };

        let mut fraud_score = 0.0;
        if request.wallet_age_days < 7 {
            fraud_score += 0.5;
        }
        if request.total_transactions < 3 {
            fraud_score += 0.3;
        }
        if request.defaults > 2 {
            fraud_score += 0.4;
        }
        let fraud_score = f64::min(fraud_score, 1.0);

        let recommended_action = if fraud_score > 0.7 || request.defaults >= 2 {
            RecommendedAction::Reject
        } else if fraud_score > 0.4 || risk_level == RiskLevel::VeryHigh {
            RecommendedAction::ManualReview
        } else if matches!(risk_level, RiskLevel::High | RiskLevel::Medium) {
            RecommendedAction::ApproveWithConditions
        } else {
            RecommendedAction::Approve
        };

        let mut max_loan = request.collateral_value_usd * 0.75;
        max_loan *= match risk_level {
            RiskLevel::VeryHigh => 0.25,
            RiskLevel::High => 0.5,
            RiskLevel::Medium => 0.75,
            _ => 1.0,
        };

        ScoreResult {
            credit_score,
            fraud_score,
            anomaly_score: 0.1,
            risk_level,
            default_probability,
            recommended_action,
            interest_rate_suggestion: interest_rate,
            max_loan_amount: max_loan,
            confidence_score: None,
            top_factors: None,
            model_version: FALLBACK_MODEL_VERSION.to_string(),
            processing_time_ms: 0,
            is_fallback: true,
        }
    }
}
