use ort::Error as OrtError;
use std::fmt;

use crate::artifacts::ArtifactError;
use crate::metadata::MetadataError;

/// Represents the different types of errors that can occur while loading or running the spam classifier.
#[derive(Debug)]
pub enum ClassifierError {
    /// Error occurred while loading or using the tokenizer
    TokenizerError(String),
    /// Error occurred while loading or running the ONNX model
    ModelError(String),
    /// Error occurred while loading the artifacts at startup
    BuildError(String),
    /// Error occurred while turning model output into labelled predictions
    PredictionError(String),
    /// Error occurred due to invalid input parameters
    ValidationError(String),
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TokenizerError(msg) => write!(f, "Tokenizer error: {}", msg),
            Self::ModelError(msg) => write!(f, "Model error: {}", msg),
            Self::BuildError(msg) => write!(f, "Build error: {}", msg),
            Self::PredictionError(msg) => write!(f, "Prediction error: {}", msg),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ClassifierError {}

impl From<OrtError> for ClassifierError {
    fn from(err: OrtError) -> Self {
        ClassifierError::BuildError(err.to_string())
    }
}

impl From<MetadataError> for ClassifierError {
    fn from(err: MetadataError) -> Self {
        ClassifierError::BuildError(err.to_string())
    }
}

impl From<ArtifactError> for ClassifierError {
    fn from(err: ArtifactError) -> Self {
        ClassifierError::BuildError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let err = ClassifierError::PredictionError("no label for class 3".into());
        assert_eq!(err.to_string(), "Prediction error: no label for class 3");

        let err = ClassifierError::TokenizerError("bad json".into());
        assert_eq!(err.to_string(), "Tokenizer error: bad json");
    }

    #[test]
    fn test_metadata_error_becomes_build_error() {
        let err: ClassifierError = MetadataError::MissingLegend.into();
        assert!(matches!(err, ClassifierError::BuildError(_)));
        assert!(err.to_string().contains("labels_legend_inverted"));
    }
}
