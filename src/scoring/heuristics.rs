//! Fraud and anomaly heuristics.
//!
//! Pure, deterministic signals computed directly from the request. They feed
//! the recommended-action decision on both the model-backed and rule-based
//! scoring paths and are reported standalone in every response.

use crate::types::LoanRiskRequest;

/// Additive fraud signal, clamped to [0, 1].
///
/// Young wallets, thin transaction history and prior defaults each add a
/// fixed increment.
pub fn fraud_score(request: &LoanRiskRequest) -> f64 {
    let mut score = 0.0;

    if request.wallet_age_days < 7 {
        score += 0.4;
    } else if request.wallet_age_days < 30 {
        score += 0.2;
    }

    if request.total_transactions < 5 {
        score += 0.3;
    }

    if request.defaults > 0 {
        score += (request.defaults as f64 * 0.2).min(0.4);
    }

    score.min(1.0)
}

/// Additive anomaly signal, clamped to [0, 1].
///
/// Flags loans far above the wallet's average transaction value and loans
/// exceeding their collateral.
pub fn anomaly_score(request: &LoanRiskRequest) -> f64 {
    let mut score: f64 = 0.0;

    if request.total_transactions > 0 {
        let avg_tx_value = request.total_volume_usd / request.total_transactions as f64;
        if request.loan_amount > avg_tx_value * 10.0 {
            score += 0.3;
        }
    }

    if request.collateral_value_usd < request.loan_amount {
        score += 0.4;
    }

    score.min(1.0)
}
