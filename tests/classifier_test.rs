//! End-to-end classifier tests. These need the model files on disk, so they
//! are ignored by default; run them with
//! `cargo test -- --ignored` after `intellilabel --fresh` has downloaded the
//! model.

use std::sync::Arc;
use std::thread;

use intellilabel::{text, BuiltinModel, Classifier, ClassifierError, LABELS};

fn setup_test_classifier() -> Classifier {
    Classifier::builder()
        .with_model(BuiltinModel::DistilBertGithubIssues)
        .unwrap()
        .build()
        .expect("Failed to create classifier")
}

#[test]
#[ignore = "requires a downloaded model"]
fn test_end_to_end_classification() -> Result<(), Box<dyn std::error::Error>> {
    let classifier = setup_test_classifier();

    let input = "Unable to run Speech2Text example in documentation";
    assert!(text::is_english_text(input));
    let prediction = classifier.predict(&text::normalize(input))?;

    assert!(LABELS.contains(&prediction.label.as_str()));
    assert_eq!(prediction.scores.len(), 3);

    let sum: f32 = prediction.scores.iter().sum();
    assert!((sum - 1.0).abs() < 1e-4);
    assert!(prediction.scores.iter().all(|&s| (0.0..=1.0).contains(&s)));

    // The selected label is the arg-max of the triple
    let max = prediction
        .scores
        .iter()
        .cloned()
        .fold(f32::NEG_INFINITY, f32::max);
    assert_eq!(prediction.scores[prediction.label_index], max);

    Ok(())
}

#[test]
#[ignore = "requires a downloaded model"]
fn test_degenerate_input_is_classified() -> Result<(), Box<dyn std::error::Error>> {
    let classifier = setup_test_classifier();

    // Empty and whitespace-only input is forwarded without special-casing.
    for input in ["", "   "] {
        let prediction = classifier.predict(&text::normalize(input))?;
        let sum: f32 = prediction.scores.iter().sum();
        assert!((sum - 1.0).abs() < 1e-4);
    }

    Ok(())
}

#[test]
#[ignore = "requires a downloaded model"]
fn test_token_length_limit() {
    let classifier = setup_test_classifier();

    let very_long_text = "words that keep the tokenizer busy ".repeat(200);
    let result = classifier.predict(&very_long_text);
    assert!(matches!(result, Err(ClassifierError::ValidationError(_))));
}

#[test]
#[ignore = "requires a downloaded model"]
fn test_count_tokens() {
    let classifier = setup_test_classifier();
    let count = classifier.count_tokens("unable run speech2text example").unwrap();
    assert!(count > 0);
}

#[test]
#[ignore = "requires a downloaded model"]
fn test_thread_safety() {
    let classifier = Arc::new(setup_test_classifier());
    let mut handles = vec![];

    for _ in 0..3 {
        let classifier = Arc::clone(&classifier);
        let handle = thread::spawn(move || {
            let result = classifier.predict("test text");
            assert!(result.is_ok());
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
#[ignore = "requires a downloaded model"]
fn test_classifier_info() {
    let classifier = setup_test_classifier();
    let info = classifier.info();
    assert_eq!(info.num_labels, 3);
    assert_eq!(info.labels, LABELS.map(String::from).to_vec());
    assert!(info.model_path.ends_with("model.onnx"));
    assert!(info.tokenizer_path.ends_with("tokenizer.json"));
}
