//! Credit Scoring Pipeline Library
//!
//! Scores DeFi loan requests from wallet activity, degrading gracefully from
//! a trained model through rule-based tiers so every request gets an answer.

pub mod config;
pub mod consumer;
pub mod explain;
pub mod feature_extractor;
pub mod metrics;
pub mod models;
pub mod producer;
pub mod scoring;
pub mod types;

pub use config::AppConfig;
pub use consumer::ScoreRequestConsumer;
pub use feature_extractor::FeatureExtractor;
pub use models::{ModelBundle, ModelLoader};
pub use producer::ScoreEventProducer;
pub use scoring::ScoringService;
pub use types::{LoanRiskRequest, ScoreEvent, ScoreResult};
