//! Scoring policies and tier orchestration

pub mod fallback;
pub mod formatter;
pub mod heuristics;
pub mod resolver;
pub mod rules;
pub mod service;

pub use fallback::FallbackScorer;
pub use resolver::{InferenceResolver, ScoringTier};
pub use rules::RuleBasedScorer;
pub use service::ScoringService;
