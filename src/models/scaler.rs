//! Standard-scaler capability loaded from trained parameters.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::models::bundle::Scaler;

/// Per-feature standardization: `(x - mean) / scale`.
///
/// Parameters come from the training pipeline's scaler export. A zero scale
/// entry degenerates to centering only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self { mean, scale }
    }

    /// Fitted feature means, used as the generic attribution baseline.
    pub fn means(&self) -> &[f64] {
        &self.mean
    }
}

impl Scaler for StandardScaler {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>> {
        if features.len() != self.mean.len() || features.len() != self.scale.len() {
            bail!(
                "scaler fitted on {} features, got {}",
                self.mean.len(),
                features.len()
            );
        }

        Ok(features
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(x, (m, s))| if *s != 0.0 { (x - m) / s } else { x - m })
            .collect())
    }
}
