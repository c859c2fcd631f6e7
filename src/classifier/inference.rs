use ndarray::{Array1, Array2};
use ort::session::Session;
use ort::value::Tensor;
use std::collections::HashMap;
use tokenizers::Tokenizer;

use super::error::ClassifierError;

/// Tokenization plus the single forward pass producing raw class scores.
///
/// The ONNX model is expected to:
/// - Accept two inputs: input_ids and attention_mask (both shape [batch_size, sequence_length])
/// - Output one logit per class, shape [batch_size, num_labels]
pub(crate) trait TextInference {
    /// Returns the initialized tokenizer if available
    fn tokenizer(&self) -> Option<&Tokenizer>;

    /// Returns the initialized ONNX session if available
    fn session(&self) -> Option<&Session>;

    /// Returns the maximum sequence length the model can handle
    fn max_sequence_length(&self) -> Option<usize>;

    /// Counts the number of tokens in the text without running the model.
    ///
    /// # Errors
    /// - `TokenizerError` if the tokenizer is not initialized
    /// - `TokenizerError` if the text cannot be encoded
    fn count_tokens(&self, text: &str) -> Result<usize, ClassifierError> {
        let tokenizer = self
            .tokenizer()
            .ok_or_else(|| ClassifierError::TokenizerError("Tokenizer not initialized".into()))?;

        tokenizer
            .encode(text, true)
            .map_err(|e| ClassifierError::TokenizerError(e.to_string()))
            .map(|encoding| encoding.get_ids().len())
    }

    /// Converts text into token IDs suitable for model input.
    ///
    /// Special tokens are included: the classification head reads the
    /// sequence through its [CLS] position.
    ///
    /// # Errors
    /// - `TokenizerError` if the tokenizer is not initialized
    /// - `TokenizerError` if the text cannot be encoded
    /// - `ValidationError` if the token length exceeds max_sequence_length
    fn tokenize(&self, text: &str) -> Result<Vec<u32>, ClassifierError> {
        let tokenizer = self
            .tokenizer()
            .ok_or_else(|| ClassifierError::TokenizerError("Tokenizer not initialized".into()))?;
        let max_length = self
            .max_sequence_length()
            .ok_or_else(|| ClassifierError::TokenizerError("Max sequence length not set".into()))?;

        let encoding = tokenizer
            .encode(text, true)
            .map_err(|e| ClassifierError::TokenizerError(e.to_string()))?;
        let token_ids = encoding.get_ids();

        if token_ids.len() > max_length {
            return Err(ClassifierError::ValidationError(format!(
                "Input text too long: {} tokens (max: {}). Consider splitting the text into smaller chunks.",
                token_ids.len(),
                max_length
            )));
        }

        Ok(token_ids.to_vec())
    }

    /// Runs the forward pass and returns the raw class logits.
    ///
    /// # Model Input Format
    /// - input_ids: Token IDs [batch_size=1, sequence_length]
    /// - attention_mask: all ones, since a single unpadded sequence is sent
    ///
    /// # Errors
    /// - `ModelError` if the session is not initialized
    /// - `ModelError` if tensor creation fails
    /// - `ModelError` if model execution fails
    /// - `ModelError` if output extraction fails
    fn logits(&self, tokens: &[u32]) -> Result<Array1<f32>, ClassifierError> {
        let session = self
            .session()
            .ok_or_else(|| ClassifierError::ModelError("Session not initialized".into()))?;

        let input_array = Array2::from_shape_vec(
            (1, tokens.len()),
            tokens.iter().map(|&x| x as i64).collect(),
        )
        .map_err(|e| ClassifierError::ModelError(format!("Failed to create input array: {}", e)))?;
        let input_dyn = input_array.into_dyn();
        let input_ids = input_dyn.as_standard_layout();

        let mask_array = Array2::from_elem((1, tokens.len()), 1i64);
        let mask_dyn = mask_array.into_dyn();
        let attention_mask = mask_dyn.as_standard_layout();

        let mut input_tensors = HashMap::new();
        input_tensors.insert(
            "input_ids",
            Tensor::from_array(&input_ids).map_err(|e| {
                ClassifierError::ModelError(format!("Failed to create input tensor: {}", e))
            })?,
        );
        input_tensors.insert(
            "attention_mask",
            Tensor::from_array(&attention_mask).map_err(|e| {
                ClassifierError::ModelError(format!("Failed to create mask tensor: {}", e))
            })?,
        );

        let outputs = session
            .run(input_tensors)
            .map_err(|e| ClassifierError::ModelError(format!("Failed to run model: {}", e)))?;
        let output_tensor = outputs[0].try_extract_tensor::<f32>().map_err(|e| {
            ClassifierError::ModelError(format!("Failed to extract output tensor: {}", e))
        })?;

        if output_tensor.ndim() != 2 {
            return Err(ClassifierError::ModelError(format!(
                "Expected logits of shape [batch, num_labels], got {} dimensions",
                output_tensor.ndim()
            )));
        }

        let logits_slice = output_tensor.slice(ndarray::s![0, ..]);
        Ok(Array1::from_iter(logits_slice.iter().cloned()))
    }

    /// Tokenizes `text` and returns the raw class logits for it.
    fn raw_scores(&self, text: &str) -> Result<Array1<f32>, ClassifierError> {
        let tokens = self.tokenize(text)?;
        self.logits(&tokens)
    }
}
