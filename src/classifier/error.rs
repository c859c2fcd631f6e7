use std::path::PathBuf;

/// Errors produced while building or running the text classifier.
///
/// Build-time failures are path-and-download-centric: a missing file means
/// the [`crate::ModelManager`] has not fetched the pair yet, while runtime
/// failures come out of the tokenizer or the ONNX session.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    /// The tokenizer could not be loaded or could not encode the input
    #[error("Tokenizer error: {0}")]
    TokenizerError(String),
    /// The ONNX model misbehaved: bad structure, failed forward pass, or
    /// unusable output
    #[error("Model error: {0}")]
    ModelError(String),
    /// The builder was used inconsistently or a component failed to load
    #[error("Build error: {0}")]
    BuildError(String),
    /// A model or tokenizer file is missing on disk
    #[error("{file_type} file not found: {}", path.display())]
    FileNotFound {
        file_type: &'static str,
        path: PathBuf,
    },
    /// The model produced output inconsistent with the label set
    #[error("Prediction error: {0}")]
    PredictionError(String),
    /// The input text cannot be classified as-is
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// ONNX Runtime failed below the session API
    #[error("ONNX Runtime error: {0}")]
    Runtime(#[from] ort::Error),
}
