//! Loan scoring request structures

use serde::{Deserialize, Serialize};

/// A loan applicant's wallet activity and loan request attributes.
///
/// All counters are non-negative; `loan_amount` is strictly positive in valid
/// input, so the collateral ratio is well-defined. `collateral_ratio` still
/// guards the degenerate case and reports 0 for a non-positive loan amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanRiskRequest {
    /// Applicant's wallet address
    pub wallet_address: String,

    /// Age of the wallet in days
    pub wallet_age_days: u32,

    /// Total wallet transactions
    pub total_transactions: u32,

    /// Total transaction volume in USD
    pub total_volume_usd: f64,

    /// Number of DeFi protocol interactions
    pub defi_interactions: u32,

    /// Requested loan amount in USD
    pub loan_amount: f64,

    /// Total collateral value in USD
    pub collateral_value_usd: f64,

    /// Loan term in months (1-36)
    pub term_months: u32,

    /// Number of previous loans
    #[serde(default)]
    pub previous_loans: u32,

    /// Number of successful repayments
    #[serde(default)]
    pub successful_repayments: u32,

    /// Number of defaults
    #[serde(default)]
    pub defaults: u32,

    /// Current reputation score (0-100)
    #[serde(default = "default_reputation")]
    pub reputation_score: u32,
}

fn default_reputation() -> u32 {
    50
}

impl LoanRiskRequest {
    /// Create a request with required fields and neutral history defaults
    pub fn new(wallet_address: String, loan_amount: f64, collateral_value_usd: f64) -> Self {
        Self {
            wallet_address,
            wallet_age_days: 0,
            total_transactions: 0,
            total_volume_usd: 0.0,
            defi_interactions: 0,
            loan_amount,
            collateral_value_usd,
            term_months: 12,
            previous_loans: 0,
            successful_repayments: 0,
            defaults: 0,
            reputation_score: 50,
        }
    }

    /// Collateral value relative to the requested amount.
    ///
    /// The single source of this ratio for feature extraction, rule-based
    /// scoring and explanations, so the three can never diverge.
    pub fn collateral_ratio(&self) -> f64 {
        if self.loan_amount > 0.0 {
            self.collateral_value_usd / self.loan_amount
        } else {
            0.0
        }
    }
}
