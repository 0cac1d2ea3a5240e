//! Type definitions for the credit scoring pipeline

pub mod request;
pub mod response;

pub use request::LoanRiskRequest;
pub use response::{
    FactorExplanation, FactorImpact, RecommendedAction, RiskLevel, ScoreEvent, ScoreResult,
};
