//! Feature extraction for credit scoring model inference.
//!
//! This module converts loan requests into the numeric vector the trained
//! model was fit on. The order is load-bearing: it must match training, and
//! the explanation path consumes the same vector and name list.

use crate::types::LoanRiskRequest;

/// Ordered feature names matching the training pipeline.
///
/// Shared by the extractor, the model bundle's default metadata and the
/// explanation path so the three can never drift apart.
pub const FEATURE_NAMES: [&str; 12] = [
    "wallet_age_days",
    "total_transactions",
    "total_volume_usd",
    "defi_interactions",
    "loan_amount",
    "collateral_value_usd",
    "term_months",
    "previous_loans",
    "successful_repayments",
    "defaults",
    "reputation_score",
    "collateral_ratio",
];

/// Feature extractor that transforms loan requests into model input features.
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Create a new feature extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract features from a loan request.
    ///
    /// Returns a 12-element vector in the order given by [`FEATURE_NAMES`],
    /// with the derived collateral ratio last.
    pub fn extract(&self, request: &LoanRiskRequest) -> Vec<f64> {
        vec![
            request.wallet_age_days as f64,
            request.total_transactions as f64,
            request.total_volume_usd,
            request.defi_interactions as f64,
            request.loan_amount,
            request.collateral_value_usd,
            request.term_months as f64,
            request.previous_loans as f64,
            request.successful_repayments as f64,
            request.defaults as f64,
            request.reputation_score as f64,
            request.collateral_ratio(),
        ]
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        FEATURE_NAMES.len()
    }

    /// Get feature names in extraction order.
    pub fn feature_names(&self) -> &'static [&'static str] {
        &FEATURE_NAMES
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_extraction() {
        let extractor = FeatureExtractor::new();
        let mut request = LoanRiskRequest::new("0xabc".to_string(), 1000.0, 1500.0);
        request.wallet_age_days = 365;
        request.reputation_score = 75;

        let features = extractor.extract(&request);

        assert_eq!(features.len(), extractor.feature_count());
        assert_eq!(features[0], 365.0); // wallet_age_days
        assert_eq!(features[4], 1000.0); // loan_amount
        assert_eq!(features[10], 75.0); // reputation_score
        assert_eq!(features[11], 1.5); // collateral_ratio
    }

    #[test]
    fn test_feature_count() {
        let extractor = FeatureExtractor::new();
        assert_eq!(extractor.feature_count(), 12);
        assert_eq!(extractor.feature_names().len(), 12);
    }

    #[test]
    fn test_collateral_ratio_guards_zero_loan() {
        let extractor = FeatureExtractor::new();
        let mut request = LoanRiskRequest::new("0xabc".to_string(), 1000.0, 1500.0);
        request.loan_amount = 0.0;

        let features = extractor.extract(&request);
        assert_eq!(features[11], 0.0);
    }
}
