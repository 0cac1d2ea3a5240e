//! ONNX Runtime backing for the model capability.

use std::path::Path;
use std::sync::RwLock;

use anyhow::{anyhow, bail, Context, Result};
use ort::memory::Allocator;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType, Tensor};
use tracing::{debug, info};

use crate::models::bundle::Model;

/// A trained classifier loaded from an ONNX file.
///
/// The session requires exclusive access to run, so it sits behind a lock;
/// the capability surface stays `&self` and lock poisoning is reported as a
/// capability failure, not a panic.
pub struct OnnxModel {
    session: RwLock<Session>,
    input_name: String,
    output_name: String,
}

impl OnnxModel {
    /// Load a model file, resolving input/output names from the graph.
    pub fn load<P: AsRef<Path>>(path: P, onnx_threads: usize) -> Result<Self> {
        let path = path.as_ref();

        ort::init().commit()?;

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(onnx_threads)?
            .commit_from_file(path)
            .context(format!("failed to load model from {:?}", path))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob") || o.name.contains("output"))
            .map(|o| o.name.clone())
            .unwrap_or_else(|| {
                session
                    .outputs
                    .last()
                    .map(|o| o.name.clone())
                    .unwrap_or_else(|| "probabilities".to_string())
            });

        info!(
            path = %path.display(),
            input = %input_name,
            output = %output_name,
            "ONNX model loaded"
        );

        Ok(Self {
            session: RwLock::new(session),
            input_name,
            output_name,
        })
    }

    fn run_probabilities(&self, features: &[f64]) -> Result<Vec<f64>> {
        let data: Vec<f32> = features.iter().map(|&x| x as f32).collect();
        let shape = vec![1_i64, data.len() as i64];
        let input_tensor =
            Tensor::from_array((shape, data)).context("failed to create input tensor")?;

        let mut session = self
            .session
            .write()
            .map_err(|e| anyhow!("session lock error: {}", e))?;

        let outputs = session.run(ort::inputs![&self.input_name => input_tensor])?;

        // Preferred output first, then anything that isn't the label
        if let Some(output) = outputs.get(&self.output_name) {
            if let Ok(Some(probs)) = extract_probability_pair(output) {
                return Ok(probs);
            }
        }

        for (name, output) in outputs.iter() {
            if name.contains("label") {
                continue;
            }
            if let Ok(Some(probs)) = extract_probability_pair(&output) {
                debug!(output = %name, "extracted probabilities from secondary output");
                return Ok(probs);
            }
        }

        bail!("no probability output found in model outputs")
    }

    fn run_label(&self, features: &[f64]) -> Result<Option<i64>> {
        let data: Vec<f32> = features.iter().map(|&x| x as f32).collect();
        let shape = vec![1_i64, data.len() as i64];
        let input_tensor =
            Tensor::from_array((shape, data)).context("failed to create input tensor")?;

        let mut session = self
            .session
            .write()
            .map_err(|e| anyhow!("session lock error: {}", e))?;

        let outputs = session.run(ort::inputs![&self.input_name => input_tensor])?;

        for (name, output) in outputs.iter() {
            if !name.contains("label") {
                continue;
            }
            if let Ok(tensor) = output.try_extract_tensor::<i64>() {
                let (_, data) = tensor;
                return Ok(data.first().copied());
            }
        }

        Ok(None)
    }
}

impl Model for OnnxModel {
    fn predict(&self, features: &[f64]) -> Result<i64> {
        if let Some(label) = self.run_label(features)? {
            return Ok(label);
        }
        // graphs without a label output: threshold the default probability
        let probs = self.run_probabilities(features)?;
        Ok(if default_probability(&probs) >= 0.5 { 1 } else { 0 })
    }

    fn predict_probability(&self, features: &[f64]) -> Result<Vec<f64>> {
        self.run_probabilities(features)
    }
}

/// Probability of the default class from a probability vector.
pub fn default_probability(probabilities: &[f64]) -> f64 {
    if probabilities.len() > 1 {
        probabilities[1]
    } else {
        probabilities.first().copied().unwrap_or(0.5)
    }
}

/// Extract a `[p_repay, p_default]` pair from a model output.
///
/// Handles tensor outputs (XGBoost, RandomForest exports) and seq(map)
/// outputs (CatBoost, LightGBM exports).
fn extract_probability_pair(output: &ort::value::DynValue) -> Result<Option<Vec<f64>>> {
    if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
        return Ok(Some(pair_from_tensor(&shape, data)));
    }

    let dtype = output.dtype();
    if DynSequenceValueType::can_downcast(&dtype) {
        return Ok(Some(pair_from_sequence_map(output)?));
    }

    Ok(None)
}

fn pair_from_tensor(shape: &ort::tensor::Shape, data: &[f32]) -> Vec<f64> {
    let dims: Vec<i64> = shape.iter().copied().collect();
    let num_classes = match dims.len() {
        2 => dims[1] as usize,
        1 => dims[0] as usize,
        _ => data.len(),
    };

    if num_classes >= 2 && data.len() >= 2 {
        vec![data[0] as f64, data[1] as f64]
    } else if let Some(&p) = data.first() {
        // single-probability output is the default-class probability
        vec![1.0 - p as f64, p as f64]
    } else {
        vec![0.5, 0.5]
    }
}

/// seq(map(int64, float)) format used by CatBoost and LightGBM exports.
fn pair_from_sequence_map(output: &ort::value::DynValue) -> Result<Vec<f64>> {
    let allocator = Allocator::default();

    let sequence = output
        .downcast_ref::<DynSequenceValueType>()
        .map_err(|e| anyhow!("failed to downcast to sequence: {}", e))?;

    let maps = sequence.try_extract_sequence::<DynMapValueType>(&allocator)?;
    if maps.is_empty() {
        bail!("empty probability sequence");
    }

    // batch size is always 1
    let kv_pairs = maps[0].try_extract_key_values::<i64, f32>()?;

    let mut p_repay = None;
    let mut p_default = None;
    for (class_id, prob) in &kv_pairs {
        match class_id {
            0 => p_repay = Some(*prob as f64),
            1 => p_default = Some(*prob as f64),
            _ => {}
        }
    }

    match (p_repay, p_default) {
        (Some(p0), Some(p1)) => Ok(vec![p0, p1]),
        (None, Some(p1)) => Ok(vec![1.0 - p1, p1]),
        (Some(p0), None) => Ok(vec![p0, 1.0 - p0]),
        (None, None) => bail!("no class probabilities found in map"),
    }
}
