//! The single-page egui UI.
//!
//! Two states: idle (input box with the default example) and
//! result-displayed (three score metrics plus the predicted label). A failed
//! language gate shows an error instead; editing the input or resubmitting
//! returns the page to idle. The page loops indefinitely on each submission.

use std::sync::Arc;

use egui::RichText;

use crate::classifier::{Classifier, Prediction};
use crate::text;

pub const APP_TITLE: &str = "IntelliLabel";
pub const APP_DESCRIPTION: &str = "IntelliLabel is a github issue classification app. \
     It classifies issue into 3 categories (Bug, Enhancement, Question).";
pub const DEFAULT_TEXT: &str = "Unable to run Speech2Text example in documentation";
pub const NON_ENGLISH_ERROR: &str = "Please input english text.";

/// The page's mutable state: the input box plus whichever outcome
/// (prediction or error) is currently showing.
#[derive(Default)]
struct PageState {
    input: String,
    prediction: Option<Prediction>,
    error: Option<String>,
}

impl PageState {
    fn new() -> Self {
        Self {
            input: DEFAULT_TEXT.to_string(),
            ..Default::default()
        }
    }

    /// Any edit returns the page to idle: both the stale prediction and a
    /// pending error are dropped, the input itself is kept.
    fn edited(&mut self) {
        self.prediction = None;
        self.error = None;
    }
}

pub struct IntelliLabelApp {
    classifier: Arc<Classifier>,
    page: PageState,
}

impl IntelliLabelApp {
    pub fn new(classifier: Arc<Classifier>) -> Self {
        Self {
            classifier,
            page: PageState::new(),
        }
    }

    /// Runs the submit pipeline: trim, gate, normalize, classify.
    ///
    /// The input itself is never modified, so a gated submission stays in
    /// the box for retry.
    fn submit(&mut self) {
        self.page.edited();

        let trimmed = self
            .page
            .input
            .trim_matches(|c| c == ' ' || c == '\n' || c == '\t');
        if !text::is_english_text(trimmed) {
            self.page.error = Some(NON_ENGLISH_ERROR.to_string());
            return;
        }

        let cleaned = text::normalize(trimmed);
        match self.classifier.predict(&cleaned) {
            Ok(prediction) => {
                log::info!(
                    "Predicted '{}' with scores {:?}",
                    prediction.label,
                    prediction.rounded_scores()
                );
                self.page.prediction = Some(prediction);
            }
            Err(e) => {
                log::error!("Prediction failed: {}", e);
                self.page.error = Some(e.to_string());
            }
        }
    }

    fn render_prediction(&self, ui: &mut egui::Ui, prediction: &Prediction) {
        let labels = Arc::clone(&self.classifier.labels);
        let scores = prediction.rounded_scores();

        ui.add_space(12.0);
        ui.columns(labels.len(), |columns| {
            for (idx, column) in columns.iter_mut().enumerate() {
                column.label(capitalize(&labels[idx]));
                column.label(RichText::new(format!("{:.3}", scores[idx])).strong().size(22.0));
            }
        });

        ui.add_space(12.0);
        ui.group(|ui| {
            ui.label(RichText::new("Prediction").strong());
            ui.label(capitalize(&prediction.label));
        });
    }
}

impl eframe::App for IntelliLabelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(APP_TITLE);
            ui.label(APP_DESCRIPTION);
            ui.add_space(10.0);

            let response = ui.add(
                egui::TextEdit::multiline(&mut self.page.input)
                    .hint_text("Enter text here:")
                    .desired_width(f32::INFINITY)
                    .desired_rows(5),
            );
            if response.changed() {
                self.page.edited();
            }

            ui.add_space(8.0);
            if ui.button("Predict 🏷").clicked() {
                self.submit();
            }

            if let Some(error) = &self.page.error {
                ui.add_space(8.0);
                ui.colored_label(egui::Color32::RED, error.as_str());
            }

            if let Some(prediction) = self.page.prediction.clone() {
                self.render_prediction(ui, &prediction);
            }
        });
    }
}

/// Upper-cases the first character, leaving the rest untouched.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
