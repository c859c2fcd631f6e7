//! A GitHub issue classifier built on ONNX sequence-classification models.
//!
//! IntelliLabel assigns one of three categories (bug, enhancement, question)
//! to an issue's text. The pipeline is strictly linear: an ASCII language
//! gate, a cheap text normalizer, a tokenizer, and one forward pass through a
//! pretrained DistilBERT head whose logits are softmaxed into a probability
//! triple.
//!
//! # Basic Usage
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use intellilabel::{text, BuiltinModel, Classifier};
//!
//! let classifier = Classifier::builder()
//!     .with_model(BuiltinModel::DistilBertGithubIssues)?
//!     .build()?;
//!
//! let input = "Unable to run Speech2Text example in documentation";
//! if text::is_english_text(input) {
//!     let prediction = classifier.predict(&text::normalize(input))?;
//!     println!("{}: {:?}", prediction.label, prediction.rounded_scores());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! The classifier is read-only after construction and can be shared across
//! threads using `Arc`; the UI holds it behind one for the process lifetime.

pub mod app;
pub mod classifier;
pub mod model_manager;
pub mod models;
mod runtime;
pub mod text;

pub use classifier::{Classifier, ClassifierBuilder, ClassifierError, ClassifierInfo, Prediction};
pub use model_manager::{ModelError, ModelManager};
pub use models::{BuiltinModel, ModelCharacteristics, ModelInfo, LABELS};
pub use runtime::{create_session_builder, RuntimeConfig};

/// Initializes the `env_logger` backend, honoring `RUST_LOG`. Later calls
/// (or an already-installed logger) are no-ops.
pub fn init_logger() {
    let _ = env_logger::Builder::from_default_env().try_init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_logger_can_be_called_repeatedly() {
        super::init_logger();
        super::init_logger();
    }
}
