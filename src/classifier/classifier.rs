use std::sync::Arc;

use ort::session::Session;
use serde::Serialize;
use tokenizers::Tokenizer;

use super::error::ClassifierError;
use super::inference::TextInference;
use super::utils::{argmax, round_score, softmax};
use crate::models::ModelCharacteristics;

/// The result of classifying one piece of text.
///
/// `scores` holds the full-precision probability per label, in label order,
/// summing to 1. The arg-max selection is made on these values;
/// [`Prediction::rounded_scores`] is only for display.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    /// The selected label
    pub label: String,
    /// Index of the selected label in the label set
    pub label_index: usize,
    /// Probability per label, in label order
    pub scores: Vec<f32>,
}

impl Prediction {
    /// Scores rounded to 3 decimal places for display.
    pub fn rounded_scores(&self) -> Vec<f32> {
        self.scores.iter().map(|&s| round_score(s)).collect()
    }
}

/// A text classifier running a pretrained ONNX sequence-classification model.
///
/// # Thread Safety
///
/// This type is `Send + Sync`: the tokenizer and session are wrapped in `Arc`
/// and never mutated after construction, so one instance can serve the whole
/// process behind an `Arc` for its lifetime.
#[derive(Debug)]
pub struct Classifier {
    pub model_path: String,
    pub tokenizer_path: String,
    pub tokenizer: Arc<Tokenizer>,
    pub session: Arc<Session>,
    pub labels: Arc<Vec<String>>,
    pub model_characteristics: ModelCharacteristics,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl TextInference for Classifier {
    fn tokenizer(&self) -> Option<&Tokenizer> {
        Some(&self.tokenizer)
    }

    fn session(&self) -> Option<&Session> {
        Some(&self.session)
    }

    fn max_sequence_length(&self) -> Option<usize> {
        Some(self.model_characteristics.max_sequence_length)
    }
}

impl Classifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Returns information about the classifier's current state
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            model_path: self.model_path.clone(),
            tokenizer_path: self.tokenizer_path.clone(),
            labels: self.labels.as_ref().clone(),
            num_labels: self.labels.len(),
            max_sequence_length: self.model_characteristics.max_sequence_length,
        }
    }

    /// Counts the tokens `text` encodes to, without running the model.
    pub fn count_tokens(&self, text: &str) -> Result<usize, ClassifierError> {
        TextInference::count_tokens(self, text)
    }

    /// Classifies `text` and returns the probability distribution over the
    /// label set plus the arg-max label.
    ///
    /// Empty and whitespace-only input is classified like any other text;
    /// the tokenizer's special tokens alone form a valid (if degenerate)
    /// sequence.
    ///
    /// # Example
    /// ```no_run
    /// # use intellilabel::{BuiltinModel, Classifier};
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let classifier = Classifier::builder()
    /// #     .with_model(BuiltinModel::DistilBertGithubIssues)?
    /// #     .build()?;
    /// let prediction = classifier.predict("unable run speech2text example documentation")?;
    /// println!("{} {:?}", prediction.label, prediction.rounded_scores());
    /// # Ok(())
    /// # }
    /// ```
    pub fn predict(&self, text: &str) -> Result<Prediction, ClassifierError> {
        let logits = self.raw_scores(text)?;
        if logits.len() != self.labels.len() {
            return Err(ClassifierError::PredictionError(format!(
                "Model produced {} logits for {} labels",
                logits.len(),
                self.labels.len()
            )));
        }

        let probabilities = softmax(&logits);
        let label_index = argmax(&probabilities);

        Ok(Prediction {
            label: self.labels[label_index].clone(),
            label_index,
            scores: probabilities.to_vec(),
        })
    }
}
