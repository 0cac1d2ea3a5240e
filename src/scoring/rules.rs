//! Rule-based prediction policy.
//!
//! Used when no trained model is loaded. Scores from hand-authored additive
//! terms over the request attributes, then reuses the standard action,
//! interest-rate and max-loan formulas. Not the same policy as the
//! fallback-service scorer: this one reports the loaded bundle's version and
//! leaves `is_fallback` unset.

use crate::scoring::{formatter, heuristics};
use crate::types::{LoanRiskRequest, RiskLevel, ScoreResult};

/// Deterministic scorer applied when the model capability is absent.
pub struct RuleBasedScorer;

impl RuleBasedScorer {
    /// Score a request from wallet activity and loan attributes.
    pub fn score(request: &LoanRiskRequest, model_version: &str) -> ScoreResult {
        let collateral_ratio = request.collateral_ratio();

        let mut base_score = 500.0;

        base_score += (request.wallet_age_days as f64 / 365.0 * 100.0).min(100.0);
        base_score += (request.total_transactions as f64 / 100.0 * 50.0).min(50.0);
        base_score += (request.defi_interactions as f64 / 20.0 * 50.0).min(50.0);
        base_score += (request.reputation_score as f64 - 50.0) * 2.0;

        if request.previous_loans > 0 {
            let success_rate =
                request.successful_repayments as f64 / request.previous_loans as f64;
            base_score += success_rate * 100.0;
        }

        base_score -= request.defaults as f64 * 100.0;

        if collateral_ratio >= 1.5 {
            base_score += 100.0;
        } else if collateral_ratio >= 1.0 {
            base_score += 50.0;
        }

        let credit_score = (base_score as i64).clamp(100, 1000) as u32;

        let (risk_level, default_probability) = if credit_score >= 800 {
            (RiskLevel::VeryLow, 0.02)
        } else if credit_score >= 700 {
            (RiskLevel::Low, 0.05)
        } else if credit_score >= 600 {
            (RiskLevel::Medium, 0.10)
        } else if credit_score >= 500 {
            (RiskLevel::High, 0.20)
        } else {
            (RiskLevel::VeryHigh, 0.35)
        };

        let fraud_score = heuristics::fraud_score(request);
        let anomaly_score = heuristics::anomaly_score(request);

        ScoreResult {
            credit_score,
            fraud_score,
            anomaly_score,
            risk_level,
            default_probability,
            recommended_action: formatter::recommended_action(
                fraud_score,
                anomaly_score,
                default_probability,
                risk_level,
            ),
            interest_rate_suggestion: formatter::interest_rate(risk_level),
            max_loan_amount: formatter::max_loan_amount(request.collateral_value_usd, risk_level),
            confidence_score: None,
            top_factors: None,
            model_version: model_version.to_string(),
            processing_time_ms: 0,
            is_fallback: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecommendedAction;

    fn established_wallet() -> LoanRiskRequest {
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

    #[test]
    fn test_established_wallet_scores_well() {
        let result = RuleBasedScorer::score(&established_wallet(), "v1.0.0");

        // 500 + 100 + 50 + 50 + 50 + 100 + 100 = 950
        assert_eq!(result.credit_score, 950);
        assert!(matches!(
            result.risk_level,
            RiskLevel::VeryLow | RiskLevel::Low
        ));
        assert_eq!(result.recommended_action, RecommendedAction::Approve);
        assert!(!result.is_fallback);
        assert_eq!(result.model_version, "v1.0.0");
    }

    #[test]
    fn test_risky_wallet_is_rejected() {
        let mut request = established_wallet();
        request.wallet_age_days = 5;
        request.collateral_value_usd = 500.0;
        request.defaults = 2;

        let result = RuleBasedScorer::score(&request, "v1.0.0");

        assert!(matches!(
            result.risk_level,
            RiskLevel::High | RiskLevel::VeryHigh
        ));
        // fraud heuristic crosses 0.7 (young wallet + defaults)
        assert!(matches!(
            result.recommended_action,
            RecommendedAction::Reject | RecommendedAction::ManualReview
        ));
    }

    #[test]
    fn test_score_is_deterministic() {
        let request = established_wallet();
        let first = RuleBasedScorer::score(&request, "v1.0.0");
        let second = RuleBasedScorer::score(&request, "v1.0.0");

        assert_eq!(first.credit_score, second.credit_score);
        assert_eq!(first.risk_level, second.risk_level);
        assert_eq!(first.recommended_action, second.recommended_action);
        assert_eq!(first.fraud_score, second.fraud_score);
    }

    #[test]
    fn test_reputation_is_monotone() {
        let mut prev = 0;
        for reputation in (0..=100).step_by(10) {
            let mut request = established_wallet();
            request.reputation_score = reputation;
            let score = RuleBasedScorer::score(&request, "v1.0.0").credit_score;
            assert!(score >= prev, "reputation {} lowered the score", reputation);
            prev = score;
        }
    }

    #[test]
    fn test_collateral_ratio_buckets() {
        let mut fully = established_wallet();
        fully.collateral_value_usd = 1000.0; // ratio 1.0 -> +50
        let mut over = established_wallet();
        over.collateral_value_usd = 1500.0; // ratio 1.5 -> +100
        let mut under = established_wallet();
        under.collateral_value_usd = 500.0; // ratio 0.5 -> +0

        let fully_score = RuleBasedScorer::score(&fully, "v1").credit_score;
        let over_score = RuleBasedScorer::score(&over, "v1").credit_score;
        let under_score = RuleBasedScorer::score(&under, "v1").credit_score;

        assert_eq!(over_score - fully_score, 50);
        assert_eq!(fully_score - under_score, 50);
    }

    #[test]
    fn test_score_clamped_to_bounds() {
        let mut dismal = LoanRiskRequest::new("0xabc".to_string(), 1000.0, 0.0);
        dismal.reputation_score = 0;
        dismal.defaults = 10;

        let result = RuleBasedScorer::score(&dismal, "v1.0.0");
        assert_eq!(result.credit_score, 100);

        let mut stellar = established_wallet();
        stellar.wallet_age_days = 3650;
        stellar.reputation_score = 100;
        let result = RuleBasedScorer::score(&stellar, "v1.0.0");
        assert_eq!(result.credit_score, 1000);
    }
}
