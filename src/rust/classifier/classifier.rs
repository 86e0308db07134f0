use std::sync::Arc;
use ort::session::Session;

use super::error::ClassifierError;
use super::inference::TextInference;
use super::tokenizer::VocabTokenizer;
use super::utils::argmax;
use super::{ClassifierInfo, LabelScore, Prediction};
use crate::metadata::ModelMetadata;

/// A thread-safe spam classifier built from the model, tokenizer and metadata artifacts.
///
/// Every field is immutable after [`ClassifierBuilder::build`](super::ClassifierBuilder::build),
/// so a single instance can be shared across request handlers behind an `Arc`.
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use spam_sms::Classifier;
///
/// let classifier = Classifier::builder()
///     .with_models_dir("models")
///     .build()?;
///
/// let prediction = classifier.predict("WIN A FREE PRIZE NOW")?;
/// println!("{} ({:.3})", prediction.top.label, prediction.top.confidence);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Classifier {
    pub model_path: String,
    pub tokenizer_path: String,
    pub metadata_path: String,
    pub model_fingerprint: String,
    pub tokenizer: Arc<VocabTokenizer>,
    pub session: Arc<Session>,
    pub metadata: Arc<ModelMetadata>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl TextInference for Classifier {
    fn tokenizer(&self) -> &VocabTokenizer {
        &self.tokenizer
    }

    fn session(&self) -> &Session {
        &self.session
    }

    fn max_sequence(&self) -> usize {
        self.metadata.max_sequence
    }
}

impl Classifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Returns information about the loaded artifacts
    pub fn info(&self) -> ClassifierInfo {
        ClassifierInfo {
            model_path: self.model_path.clone(),
            tokenizer_path: self.tokenizer_path.clone(),
            metadata_path: self.metadata_path.clone(),
            model_fingerprint: self.model_fingerprint.clone(),
            num_classes: self.metadata.num_classes(),
            class_labels: self.metadata.labels.clone(),
            max_sequence: self.metadata.max_sequence,
            vocab_size: self.tokenizer.vocab_size(),
        }
    }

    /// Vocabulary ids for the text, before padding
    pub fn tokenize(&self, text: &str) -> Result<Vec<u32>, ClassifierError> {
        TextInference::tokenize(self, text)
    }

    /// Classifies the text, returning the top class and the score of every class.
    pub fn predict(&self, text: &str) -> Result<Prediction, ClassifierError> {
        let probabilities = self.infer(text)?;
        label_predictions(&probabilities, &self.metadata.labels)
    }
}

/// Pairs each class probability with its label and picks the most probable class.
///
/// # Errors
/// - `PredictionError` if the output is empty
/// - `PredictionError` if a class index has no label
pub fn label_predictions(probabilities: &[f32], labels: &[String]) -> Result<Prediction, ClassifierError> {
    let predictions = probabilities.iter()
        .enumerate()
        .map(|(idx, &p)| {
            labels.get(idx)
                .map(|label| LabelScore { label: label.clone(), confidence: f64::from(p) })
                .ok_or_else(|| ClassifierError::PredictionError(
                    format!("No label for class index {}", idx)
                ))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let top_idx = argmax(probabilities)
        .ok_or_else(|| ClassifierError::PredictionError("Model returned no class scores".into()))?;

    Ok(Prediction {
        top: predictions[top_idx].clone(),
        predictions,
    })
}
