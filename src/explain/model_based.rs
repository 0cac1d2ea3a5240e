//! Attribution-based explanation path.

use anyhow::{bail, Context, Result};

use crate::explain::ExplanationResult;
use crate::feature_extractor::FeatureExtractor;
use crate::models::bundle::ModelBundle;
use crate::types::{FactorExplanation, FactorImpact, LoanRiskRequest};

const EPSILON: f64 = 1e-6;

/// Explain a request through the bundle's interpreter capability.
///
/// Fails when the interpreter or model is absent, or when attribution
/// errors; the caller falls back to the rule-based path transparently.
pub fn explain(bundle: &ModelBundle, request: &LoanRiskRequest) -> Result<ExplanationResult> {
    let interpreter = bundle
        .interpreter()
        .context("interpreter capability absent")?;
    if bundle.model().is_none() {
        bail!("model not loaded, cannot attribute");
    }

    let extractor = FeatureExtractor::new();
    let raw_features = extractor.extract(request);

    let mut features = raw_features.clone();
    if let Some(scaler) = bundle.scaler() {
        features = scaler.transform(&features).context("scaler transform failed")?;
    }

    let rows = interpreter
        .attribute(&features)
        .context("attribution failed")?;
    if rows.is_empty() {
        bail!("interpreter returned no attribution rows");
    }

    // positive (default) class for binary models, sole row otherwise
    let attributions = if rows.len() > 1 { &rows[1] } else { &rows[0] };

    let feature_names = bundle.feature_names();
    if attributions.len() != feature_names.len() {
        bail!(
            "attribution length {} does not match {} features",
            attributions.len(),
            feature_names.len()
        );
    }

    let mut factors: Vec<FactorExplanation> = feature_names
        .iter()
        .zip(attributions.iter().zip(raw_features.iter()))
        .map(|(name, (attribution, raw_value))| FactorExplanation {
            feature: name.clone(),
            impact: if *attribution > 0.0 {
                FactorImpact::Positive
            } else {
                FactorImpact::Negative
            },
            value: *raw_value,
            contribution: attribution.abs(),
        })
        .collect();

    factors.sort_by(|a, b| b.contribution.total_cmp(&a.contribution));
    factors.truncate(3);

    Ok(ExplanationResult {
        top_factors: factors,
        confidence: confidence_from_dispersion(attributions),
    })
}

/// Confidence from the spread of attribution magnitudes: tightly clustered
/// attributions read as a confident explanation.
fn confidence_from_dispersion(attributions: &[f64]) -> f64 {
    if attributions.is_empty() {
        return 0.5;
    }

    let n = attributions.len() as f64;
    let mean = attributions.iter().sum::<f64>() / n;
    let variance = attributions.iter().map(|a| (a - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();
    let mean_abs = attributions.iter().map(|a| a.abs()).sum::<f64>() / n;

    let confidence = 1.0 - (std_dev / (mean_abs + EPSILON)).min(1.0);
    confidence.clamp(0.5, 0.99)
}
