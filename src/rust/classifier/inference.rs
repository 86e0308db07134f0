use std::collections::HashMap;
use ndarray::Array2;
use ort::session::Session;
use ort::tensor::TensorElementType;
use ort::value::{DynValue, Tensor, ValueType};

use super::error::ClassifierError;
use super::sequence::pad_sequence;
use super::tokenizer::VocabTokenizer;

/// Runs raw text through the tokenizer and the ONNX model.
///
/// The pipeline is:
/// 1. Tokenization of input text into vocabulary ids
/// 2. Left padding / truncation to the model's fixed sequence length
/// 3. One forward pass producing a probability per class
///
/// The ONNX model is expected to:
/// - Accept one input of shape [batch_size, sequence_length]. Integer and float
///   element types are both accepted since Keras exports often declare the
///   embedding input as float32.
/// - Output class probabilities of shape [batch_size, num_classes]
pub(crate) trait TextInference {
    fn tokenizer(&self) -> &VocabTokenizer;

    fn session(&self) -> &Session;

    /// Returns the fixed sequence length the model was trained with
    fn max_sequence(&self) -> usize;

    fn tokenize(&self, text: &str) -> Result<Vec<u32>, ClassifierError> {
        self.tokenizer().encode(text)
    }

    /// Tokenizes and pads text into the exact row fed to the model.
    fn encode_padded(&self, text: &str) -> Result<Vec<i64>, ClassifierError> {
        let max_sequence = self.max_sequence();
        let ids = self.tokenize(text)?;
        if ids.len() > max_sequence {
            log::debug!("Truncating {} tokens to the last {}", ids.len(), max_sequence);
        }
        Ok(pad_sequence(&ids, max_sequence))
    }

    /// Returns the model's output distribution for the given text.
    fn infer(&self, text: &str) -> Result<Vec<f32>, ClassifierError> {
        let padded = self.encode_padded(text)?;
        self.forward(&padded)
    }

    /// Runs a single forward pass over one padded sequence.
    ///
    /// # Errors
    /// - `ModelError` if tensor creation fails
    /// - `ModelError` if model execution fails
    /// - `ModelError` if output extraction fails or the output is empty
    fn forward(&self, padded: &[i64]) -> Result<Vec<f32>, ClassifierError> {
        let session = self.session();
        let input = session.inputs.first()
            .ok_or_else(|| ClassifierError::ModelError("Model has no inputs".into()))?;

        let shape = (1, padded.len());
        let value: DynValue = match &input.input_type {
            ValueType::Tensor { ty: TensorElementType::Float32, .. } => {
                let array = Array2::from_shape_vec(shape, padded.iter().map(|&x| x as f32).collect())
                    .map_err(|e| ClassifierError::ModelError(format!("Failed to create input array: {}", e)))?;
                Tensor::from_array(array)
                    .map_err(|e| ClassifierError::ModelError(format!("Failed to create input tensor: {}", e)))?
                    .into_dyn()
            }
            ValueType::Tensor { ty: TensorElementType::Int32, .. } => {
                let array = Array2::from_shape_vec(shape, padded.iter().map(|&x| x as i32).collect())
                    .map_err(|e| ClassifierError::ModelError(format!("Failed to create input array: {}", e)))?;
                Tensor::from_array(array)
                    .map_err(|e| ClassifierError::ModelError(format!("Failed to create input tensor: {}", e)))?
                    .into_dyn()
            }
            _ => {
                let array = Array2::from_shape_vec(shape, padded.to_vec())
                    .map_err(|e| ClassifierError::ModelError(format!("Failed to create input array: {}", e)))?;
                Tensor::from_array(array)
                    .map_err(|e| ClassifierError::ModelError(format!("Failed to create input tensor: {}", e)))?
                    .into_dyn()
            }
        };

        let mut input_tensors = HashMap::new();
        input_tensors.insert(input.name.as_str(), value);

        let outputs = session.run(input_tensors)
            .map_err(|e| ClassifierError::ModelError(format!("Failed to run model: {}", e)))?;
        let output_tensor = outputs[0].try_extract_tensor::<f32>()
            .map_err(|e| ClassifierError::ModelError(format!("Failed to extract output tensor: {}", e)))?;

        let probabilities: Vec<f32> = output_tensor.iter().copied().collect();
        if probabilities.is_empty() {
            return Err(ClassifierError::ModelError("Model produced an empty output".into()));
        }
        Ok(probabilities)
    }
}
