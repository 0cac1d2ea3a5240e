//! Occlusion-based feature attribution.

use std::sync::Arc;

use anyhow::{bail, Result};

use crate::models::bundle::{Interpreter, Model};

/// Attributes the prediction to individual features by occluding each one
/// with its baseline value and measuring the probability shift.
///
/// The baseline encodes the declared interpretation strategy: zeros for tree
/// ensembles, fitted feature means for opaque models. Contributions are
/// reported per class so the caller can select the default class.
pub struct OcclusionInterpreter {
    model: Arc<dyn Model>,
    baseline: Vec<f64>,
}

impl OcclusionInterpreter {
    pub fn new(model: Arc<dyn Model>, baseline: Vec<f64>) -> Self {
        Self { model, baseline }
    }
}

impl Interpreter for OcclusionInterpreter {
    fn attribute(&self, features: &[f64]) -> Result<Vec<Vec<f64>>> {
        if features.len() != self.baseline.len() {
            bail!(
                "interpreter baseline has {} features, got {}",
                self.baseline.len(),
                features.len()
            );
        }

        let reference = self.model.predict_probability(features)?;
        if reference.is_empty() {
            bail!("model returned no class probabilities");
        }

        let mut contributions = vec![vec![0.0; features.len()]; reference.len()];

        let mut occluded = features.to_vec();
        for (i, &baseline_value) in self.baseline.iter().enumerate() {
            let original = occluded[i];
            occluded[i] = baseline_value;
            let shifted = self.model.predict_probability(&occluded)?;
            occluded[i] = original;

            if shifted.len() != reference.len() {
                bail!(
                    "model changed class count during attribution: {} vs {}",
                    shifted.len(),
                    reference.len()
                );
            }

            for (class, row) in contributions.iter_mut().enumerate() {
                row[i] = reference[class] - shifted[class];
            }
        }

        Ok(contributions)
    }
}
