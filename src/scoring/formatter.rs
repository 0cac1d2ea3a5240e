//! ML-derived response formatting.
//!
//! Maps a trained model's default probability onto the full response
//! contract. The recommended-action, interest-rate and max-loan formulas
//! live here and are shared with the rule-based prediction policy.

use crate::scoring::heuristics;
use crate::types::{LoanRiskRequest, RecommendedAction, RiskLevel, ScoreResult};

const BASE_INTEREST_RATE: f64 = 5.0;

/// Build a [`ScoreResult`] from a model-derived default probability.
///
/// Credit score is a linear map of no-default confidence onto [100, 1000].
/// Fraud and anomaly signals come from the heuristics, independent of the
/// model.
pub fn score_from_probability(
    request: &LoanRiskRequest,
    default_probability: f64,
    model_version: &str,
) -> ScoreResult {
    let credit_score = ((1.0 - default_probability) * 900.0 + 100.0).round() as u32;
    let risk_level = RiskLevel::from_default_probability(default_probability);

    let fraud_score = heuristics::fraud_score(request);
    let anomaly_score = heuristics::anomaly_score(request);

    ScoreResult {
        credit_score,
        fraud_score,
        anomaly_score,
        risk_level,
        default_probability,
        recommended_action: recommended_action(
            fraud_score,
            anomaly_score,
            default_probability,
            risk_level,
        ),
        interest_rate_suggestion: interest_rate(risk_level),
        max_loan_amount: max_loan_amount(request.collateral_value_usd, risk_level),
        confidence_score: None,
        top_factors: None,
        model_version: model_version.to_string(),
        processing_time_ms: 0,
        is_fallback: false,
    }
}

/// Standard action decision shared by the model-backed and rule-based
/// prediction paths.
pub(crate) fn recommended_action(
    fraud_score: f64,
    anomaly_score: f64,
    default_probability: f64,
    risk_level: RiskLevel,
) -> RecommendedAction {
    if fraud_score > 0.7 || default_probability > 0.75 {
        RecommendedAction::Reject
    } else if fraud_score > 0.5
        || anomaly_score > 0.5
        || matches!(risk_level, RiskLevel::High | RiskLevel::VeryHigh)
    {
        RecommendedAction::ManualReview
    } else if risk_level == RiskLevel::Medium {
        RecommendedAction::ApproveWithConditions
    } else {
        RecommendedAction::Approve
    }
}

/// Base rate plus the tier's risk premium.
pub(crate) fn interest_rate(risk_level: RiskLevel) -> f64 {
    BASE_INTEREST_RATE + risk_level.risk_premium()
}

/// 80% of collateral, haircut further for risky tiers.
pub(crate) fn max_loan_amount(collateral_value_usd: f64, risk_level: RiskLevel) -> f64 {
    let max_loan = collateral_value_usd * 0.8;
    match risk_level {
        RiskLevel::High | RiskLevel::VeryHigh => max_loan * 0.5,
        RiskLevel::Medium => max_loan * 0.75,
        _ => max_loan,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> LoanRiskRequest {
        let mut request = LoanRiskRequest::new("0xabc".to_string(), 1000.0, 1500.0);
        request.wallet_age_days = 365;
        request.total_transactions = 150;
        request.total_volume_usd = 50000.0;
        request.defi_interactions = 25;
        request.reputation_score = 75;
        request
    }

    #[test]
    fn test_score_from_low_probability() {
        let result = score_from_probability(&sample_request(), 0.05, "v1.0.0");

        assert_eq!(result.credit_score, 955);
        assert_eq!(result.risk_level, RiskLevel::VeryLow);
        assert_eq!(result.recommended_action, RecommendedAction::Approve);
        assert_eq!(result.interest_rate_suggestion, 5.0);
        assert_eq!(result.max_loan_amount, 1200.0);
        assert!(!result.is_fallback);
        assert_eq!(result.model_version, "v1.0.0");
    }

    #[test]
    fn test_score_from_high_probability() {
        let result = score_from_probability(&sample_request(), 0.8, "v1.0.0");

        assert_eq!(result.credit_score, 280);
        assert_eq!(result.risk_level, RiskLevel::VeryHigh);
        // probability above 0.75 forces a reject regardless of fraud signal
        assert_eq!(result.recommended_action, RecommendedAction::Reject);
        assert_eq!(result.interest_rate_suggestion, 20.0);
        // 1500 * 0.8 * 0.5
        assert_eq!(result.max_loan_amount, 600.0);
    }

    #[test]
    fn test_medium_risk_gets_conditions() {
        let result = score_from_probability(&sample_request(), 0.30, "v1.0.0");

        assert_eq!(result.risk_level, RiskLevel::Medium);
        assert_eq!(
            result.recommended_action,
            RecommendedAction::ApproveWithConditions
        );
        assert_eq!(result.interest_rate_suggestion, 10.0);
        // 1500 * 0.8 * 0.75
        assert_eq!(result.max_loan_amount, 900.0);
    }

    #[test]
    fn test_high_risk_routes_to_review() {
        let result = score_from_probability(&sample_request(), 0.60, "v1.0.0");

        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(result.recommended_action, RecommendedAction::ManualReview);
    }

    #[test]
    fn test_fraud_signal_overrides_good_probability() {
        let mut request = sample_request();
        request.wallet_age_days = 3;
        request.total_transactions = 2;
        request.defaults = 1;

        // fraud: 0.4 + 0.3 + 0.2 = 0.9 > 0.7
        let result = score_from_probability(&request, 0.05, "v1.0.0");
        assert_eq!(result.recommended_action, RecommendedAction::Reject);
    }

    #[test]
    fn test_credit_score_bounds() {
        let certain_default = score_from_probability(&sample_request(), 1.0, "v1");
        assert_eq!(certain_default.credit_score, 100);

        let certain_repay = score_from_probability(&sample_request(), 0.0, "v1");
        assert_eq!(certain_repay.credit_score, 1000);
    }
}
