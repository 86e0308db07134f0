use std::path::{Path, PathBuf};
use std::sync::Arc;
use ort::session::Session;
use log::{info, error};

use super::error::ClassifierError;
use super::inference::TextInference;
use super::classifier::Classifier;
use super::tokenizer::VocabTokenizer;
use crate::artifacts::{self, ArtifactPaths};
use crate::metadata::ModelMetadata;
use crate::runtime::{RuntimeConfig, create_session_builder};

/// Text run through the model once at build time to check its output width.
pub const WARMUP_TEXT: &str = "Hello World";

/// A builder for loading a Classifier from its three artifacts.
#[derive(Default, Debug)]
pub struct ClassifierBuilder {
    model_path: Option<PathBuf>,
    tokenizer_path: Option<PathBuf>,
    metadata_path: Option<PathBuf>,
    runtime_config: RuntimeConfig,
}

impl ClassifierBuilder {
    /// Creates a new empty ClassifierBuilder instance with default configuration
    ///
    /// # Example
    /// ```
    /// use spam_sms::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self {
            model_path: None,
            tokenizer_path: None,
            metadata_path: None,
            runtime_config: RuntimeConfig::default(),
        }
    }

    /// Sets the runtime configuration for ONNX model execution
    ///
    /// # Example
    /// ```
    /// use spam_sms::{ClassifierBuilder, RuntimeConfig};
    ///
    /// let config = RuntimeConfig::default();
    /// let builder = ClassifierBuilder::new()
    ///     .with_runtime_config(config);
    /// ```
    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    /// Uses the standard `spam-sms/` artifact layout under `models_dir`.
    ///
    /// # Example
    /// ```
    /// use spam_sms::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new()
    ///     .with_models_dir("models");
    /// ```
    pub fn with_models_dir(self, models_dir: impl AsRef<Path>) -> Self {
        self.with_artifact_paths(&ArtifactPaths::new(models_dir))
    }

    pub fn with_artifact_paths(mut self, paths: &ArtifactPaths) -> Self {
        self.model_path = Some(paths.get_model_path());
        self.tokenizer_path = Some(paths.get_tokenizer_path());
        self.metadata_path = Some(paths.get_metadata_path());
        self
    }

    /// Sets each artifact path individually
    ///
    /// # Returns
    /// * `Result<Self, ClassifierError>` - The builder instance if successful, or an error if:
    ///   - Any path is empty
    ///   - The paths are already set
    pub fn with_custom_artifacts(
        mut self,
        model_path: &str,
        tokenizer_path: &str,
        metadata_path: &str,
    ) -> Result<Self, ClassifierError> {
        if model_path.is_empty() || tokenizer_path.is_empty() || metadata_path.is_empty() {
            return Err(ClassifierError::BuildError("Artifact paths cannot be empty".to_string()));
        }
        if self.model_path.is_some() || self.tokenizer_path.is_some() || self.metadata_path.is_some() {
            return Err(ClassifierError::BuildError("Artifact paths already set".to_string()));
        }

        self.model_path = Some(PathBuf::from(model_path));
        self.tokenizer_path = Some(PathBuf::from(tokenizer_path));
        self.metadata_path = Some(PathBuf::from(metadata_path));
        Ok(self)
    }

    /// Loads every artifact and returns the ready-to-serve Classifier
    ///
    /// # Returns
    /// * `Result<Classifier, ClassifierError>` - The constructed Classifier if successful, or an error if:
    ///   - No artifact paths are set
    ///   - Any artifact file does not exist (all missing files are named)
    ///   - The metadata is malformed or has no label legend
    ///   - The tokenizer or model failed to load
    ///   - The model structure is invalid
    ///   - The model's number of output classes differs from the label legend
    pub fn build(self) -> Result<Classifier, ClassifierError> {
        let (model_path, tokenizer_path, metadata_path) =
            match (self.model_path, self.tokenizer_path, self.metadata_path) {
                (Some(m), Some(t), Some(d)) => (m, t, d),
                _ => return Err(ClassifierError::BuildError("Artifact paths must be set".to_string())),
            };

        artifacts::ensure_exist(&[&model_path, &tokenizer_path, &metadata_path])
            .map_err(|e| {
                error!("{}", e);
                ClassifierError::from(e)
            })?;

        let metadata = ModelMetadata::from_file(&metadata_path)
            .map_err(|e| {
                error!("Failed to load metadata: {}", e);
                ClassifierError::from(e)
            })?;
        info!(
            "Metadata loaded: max_sequence={}, labels={:?}",
            metadata.max_sequence, metadata.labels
        );

        let tokenizer = VocabTokenizer::from_file(&tokenizer_path)
            .map_err(|e| {
                error!("Failed to load tokenizer: {}", e);
                ClassifierError::BuildError(format!("Failed to load tokenizer: {}", e))
            })?;
        info!("Tokenizer loaded successfully ({} entries)", tokenizer.vocab_size());

        // Create session using the singleton environment
        let session = create_session_builder(&self.runtime_config)?
            .commit_from_file(&model_path)?;

        Self::validate_model(&session)?;
        info!("Model structure validated successfully");

        let model_fingerprint = artifacts::fingerprint(&model_path)?;
        info!("Model fingerprint (sha256): {}", model_fingerprint);

        let classifier = Classifier {
            model_path: model_path.to_string_lossy().to_string(),
            tokenizer_path: tokenizer_path.to_string_lossy().to_string(),
            metadata_path: metadata_path.to_string_lossy().to_string(),
            model_fingerprint,
            tokenizer: Arc::new(tokenizer),
            session: Arc::new(session),
            metadata: Arc::new(metadata),
        };

        // Infer the number of output classes by running a test input
        let probabilities = classifier.infer(WARMUP_TEXT)?;
        let num_classes = classifier.metadata.num_classes();
        if probabilities.len() != num_classes {
            return Err(ClassifierError::BuildError(format!(
                "Model outputs {} classes but labels_legend_inverted defines {}",
                probabilities.len(), num_classes
            )));
        }
        info!("Warm-up inference produced {} class scores", num_classes);

        Ok(classifier)
    }

    /// Validates that the model has the expected input/output structure
    ///
    /// # Returns
    /// * `Result<(), ClassifierError>` - Ok if validation passes, or an error if:
    ///   - The model has no input tensor for the token sequence
    ///   - The model doesn't have any output tensors
    fn validate_model(session: &Session) -> Result<(), ClassifierError> {
        if session.inputs.is_empty() {
            return Err(ClassifierError::ModelError(
                "Model must have 1 input for the padded token sequence, found none".to_string()
            ));
        }
        if session.inputs.len() > 1 {
            log::warn!(
                "Model declares {} inputs; only '{}' will be fed",
                session.inputs.len(), session.inputs[0].name
            );
        }

        if session.outputs.is_empty() {
            return Err(ClassifierError::ModelError(
                "Model must have at least 1 output for class probabilities".to_string()
            ));
        }

        Ok(())
    }
}
