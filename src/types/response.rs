//! Scoring response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Model version tag reported by the fallback-service scoring policy
pub const FALLBACK_MODEL_VERSION: &str = "fallback-v1.0";

/// Risk tier, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskLevel {
    /// Classify a model-derived default probability
    pub fn from_default_probability(default_probability: f64) -> Self {
        if default_probability < 0.10 {
            RiskLevel::VeryLow
        } else if default_probability < 0.25 {
            RiskLevel::Low
        } else if default_probability < 0.50 {
            RiskLevel::Medium
        } else if default_probability < 0.75 {
            RiskLevel::High
        } else {
            RiskLevel::VeryHigh
        }
    }

    /// Interest-rate markup for this tier, in percentage points
    pub fn risk_premium(&self) -> f64 {
        match self {
            RiskLevel::VeryLow => 0.0,
            RiskLevel::Low => 2.0,
            RiskLevel::Medium => 5.0,
            RiskLevel::High => 10.0,
            RiskLevel::VeryHigh => 15.0,
        }
    }
}

/// Action the lending platform should take on the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendedAction {
    Approve,
    ApproveWithConditions,
    ManualReview,
    Reject,
}

/// Direction a factor pushed the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorImpact {
    Positive,
    Negative,
    Neutral,
}

/// A single contributing factor in a score explanation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorExplanation {
    /// Feature name, drawn from the model's feature list
    pub feature: String,
    /// Direction of the push
    pub impact: FactorImpact,
    /// Raw feature value from the request
    pub value: f64,
    /// Contribution magnitude
    pub contribution: f64,
}

/// Full scoring response produced fresh per request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Credit score (100-1000)
    pub credit_score: u32,

    /// Fraud probability (0-1)
    pub fraud_score: f64,

    /// Anomaly score (0-1)
    pub anomaly_score: f64,

    /// Risk tier classification
    pub risk_level: RiskLevel,

    /// Probability of default (0-1)
    pub default_probability: f64,

    /// Recommended action for the request
    pub recommended_action: RecommendedAction,

    /// Suggested interest rate, percent
    pub interest_rate_suggestion: f64,

    /// Maximum recommended loan amount in USD
    pub max_loan_amount: f64,

    /// Explanation confidence (0-1), present when an explanation was attached
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,

    /// Top factors influencing the decision, strongest first
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_factors: Option<Vec<FactorExplanation>>,

    /// Version tag of the scoring tier that produced this result
    pub model_version: String,

    /// End-to-end processing time in milliseconds
    #[serde(default)]
    pub processing_time_ms: u64,

    /// True iff the fallback-service scoring tier produced this result
    #[serde(default)]
    pub is_fallback: bool,
}

/// Scored request event published to downstream consumers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreEvent {
    /// Unique event identifier
    pub event_id: String,

    /// Wallet the score belongs to
    pub wallet_address: String,

    /// Event generation timestamp
    pub timestamp: DateTime<Utc>,

    /// The scoring response
    #[serde(flatten)]
    pub result: ScoreResult,
}

impl ScoreEvent {
    pub fn new(wallet_address: String, result: ScoreResult) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            wallet_address,
            timestamp: Utc::now(),
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_from_default_probability() {
        assert_eq!(RiskLevel::from_default_probability(0.05), RiskLevel::VeryLow);
        assert_eq!(RiskLevel::from_default_probability(0.10), RiskLevel::Low);
        assert_eq!(RiskLevel::from_default_probability(0.30), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_default_probability(0.60), RiskLevel::High);
        assert_eq!(RiskLevel::from_default_probability(0.90), RiskLevel::VeryHigh);
    }

    #[test]
    fn test_risk_level_wire_format() {
        let json = serde_json::to_string(&RiskLevel::VeryLow).unwrap();
        assert_eq!(json, "\"VERY_LOW\"");

        let json = serde_json::to_string(&RecommendedAction::ApproveWithConditions).unwrap();
        assert_eq!(json, "\"APPROVE_WITH_CONDITIONS\"");

        let json = serde_json::to_string(&FactorImpact::Positive).unwrap();
        assert_eq!(json, "\"positive\"");
    }

    #[test]
    fn test_score_event_serialization() {
        let result = ScoreResult {
            credit_score: 750,
            fraud_score: 0.05,
            anomaly_score: 0.1,
            risk_level: RiskLevel::Low,
            default_probability: 0.08,
            recommended_action: RecommendedAction::Approve,
            interest_rate_suggestion: 7.0,
            max_loan_amount: 1200.0,
            confidence_score: None,
            top_factors: None,
            model_version: "v1.0.0".to_string(),
            processing_time_ms: 4,
            is_fallback: false,
        };

        let event = ScoreEvent::new("0xabc".to_string(), result);
        let json = serde_json::to_string(&event).unwrap();
        let deserialized: ScoreEvent = serde_json::from_str(&json).unwrap();

        assert_eq!(event.event_id, deserialized.event_id);
        assert_eq!(deserialized.result.credit_score, 750);
        assert_eq!(deserialized.result.risk_level, RiskLevel::Low);
        // envelope fields sit flat next to the score fields on the wire
        assert!(json.contains("\"credit_score\":750"));
        assert!(json.contains("\"event_id\""));
    }
}
