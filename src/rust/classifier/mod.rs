use serde::Serialize;

mod error;
mod inference;
pub mod builder;
pub mod classifier;
pub mod sequence;
pub mod tokenizer;
mod utils;

pub use error::ClassifierError;
pub use classifier::{Classifier, label_predictions};
pub use builder::ClassifierBuilder;
pub use sequence::pad_sequence;
pub use tokenizer::VocabTokenizer;

/// Information about the loaded artifacts backing a classifier
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Path to the ONNX model file
    pub model_path: String,
    /// Path to the tokenizer file
    pub tokenizer_path: String,
    /// Path to the metadata file
    pub metadata_path: String,
    /// SHA-256 of the model file
    pub model_fingerprint: String,
    /// Number of output classes
    pub num_classes: usize,
    /// Labels in class-index order
    pub class_labels: Vec<String>,
    /// Fixed length every input is padded or truncated to
    pub max_sequence: usize,
    /// Number of entries in the tokenizer vocabulary
    pub vocab_size: usize,
}

/// A class label paired with the probability the model assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelScore {
    pub label: String,
    pub confidence: f64,
}

/// The result of classifying one piece of text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Highest-probability class
    pub top: LabelScore,
    /// Every class, in class-index order
    pub predictions: Vec<LabelScore>,
}
