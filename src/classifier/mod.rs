mod builder;
#[allow(clippy::module_inception)]
mod classifier;
mod error;
mod inference;
mod utils;

pub use builder::ClassifierBuilder;
pub use classifier::{Classifier, Prediction};
pub use error::ClassifierError;

/// Information about the current state and configuration of a classifier
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Path to the ONNX model file
    pub model_path: String,
    /// Path to the tokenizer file
    pub tokenizer_path: String,
    /// Category labels, in logit order
    pub labels: Vec<String>,
    /// Number of output classes
    pub num_labels: usize,
    /// Maximum token count the model accepts
    pub max_sequence_length: usize,
}
