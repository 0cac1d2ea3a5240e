//! Model capabilities and inference components

pub mod bundle;
pub mod interpret;
pub mod loader;
pub mod onnx;
pub mod predictor;
pub mod scaler;

pub use bundle::{FeatureMetadata, InterpretationStrategy, ModelBundle};
pub use loader::ModelLoader;
pub use predictor::ModelPredictor;
