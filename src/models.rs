//! Built-in model registry.
//!
//! A single pretrained model is supported: a DistilBERT sequence-classification
//! head fine-tuned on GitHub issue titles. The label set is fixed at process
//! start and its order matches the model's output logits.

/// Category labels, in the model's logit order.
pub const LABELS: [&str; 3] = ["bug", "enhancement", "question"];

/// HuggingFace repository the built-in model is fetched from.
const GITHUB_ISSUES_REPO: &str = "ivanlau/distil-bert-uncased-finetuned-github-issues";

/// Models bundled with the crate, downloadable through [`crate::ModelManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinModel {
    /// DistilBERT (uncased) fine-tuned to route GitHub issues into
    /// bug / enhancement / question.
    DistilBertGithubIssues,
}

/// Download coordinates for a model and its matching tokenizer.
///
/// `model_hash`/`tokenizer_hash` are optional SHA-256 pins. The built-in
/// model's upstream repository publishes no checksums, so its pins are `None`
/// and downloads are accepted as-is.
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub name: String,
    pub model_url: String,
    pub tokenizer_url: String,
    pub model_hash: Option<String>,
    pub tokenizer_hash: Option<String>,
}

/// Static characteristics of a model's architecture.
#[derive(Debug, Clone)]
pub struct ModelCharacteristics {
    /// Number of output classes (logits).
    pub num_labels: usize,
    /// Maximum token count the model accepts.
    pub max_sequence_length: usize,
    /// Approximate on-disk size, for log messages.
    pub model_size_mb: usize,
}

impl BuiltinModel {
    pub fn get_model_info(&self) -> ModelInfo {
        match self {
            Self::DistilBertGithubIssues => ModelInfo {
                name: "distil-bert-uncased-finetuned-github-issues".to_string(),
                model_url: format!(
                    "https://huggingface.co/{}/resolve/main/onnx/model.onnx",
                    GITHUB_ISSUES_REPO
                ),
                tokenizer_url: format!(
                    "https://huggingface.co/{}/resolve/main/tokenizer.json",
                    GITHUB_ISSUES_REPO
                ),
                model_hash: None,
                tokenizer_hash: None,
            },
        }
    }

    pub fn characteristics(&self) -> ModelCharacteristics {
        match self {
            Self::DistilBertGithubIssues => ModelCharacteristics {
                num_labels: LABELS.len(),
                max_sequence_length: 512,
                model_size_mb: 255,
            },
        }
    }
}
