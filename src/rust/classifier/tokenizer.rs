use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use serde::Deserialize;
use serde_json::Value;
use tokenizers::models::wordlevel::WordLevel;
use tokenizers::normalizers::replace::{Replace, ReplacePattern};
use tokenizers::normalizers::{Lowercase, NormalizerWrapper, Sequence};
use tokenizers::pre_tokenizers::split::{Split, SplitPattern};
use tokenizers::pre_tokenizers::PreTokenizerWrapper;
use tokenizers::models::ModelWrapper;
use tokenizers::{SplitDelimiterBehavior, Tokenizer};

use super::error::ClassifierError;

/// Characters Keras strips from text before splitting, unless the export overrides them.
pub const KERAS_DEFAULT_FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

/// Placeholder unknown token for vocabularies exported without an OOV token.
/// Index 0 is reserved for padding in Keras vocabularies, so ids mapped here are dropped.
const UNK_PLACEHOLDER: &str = "\u{0}[UNK]";
const UNK_PLACEHOLDER_ID: u32 = 0;

/// Post-encoding rules of Keras `texts_to_sequences` that a `WordLevel` model cannot express.
#[derive(Debug, Clone)]
struct IndexPolicy {
    num_words: Option<u32>,
    oov_id: Option<u32>,
}

impl IndexPolicy {
    fn apply(&self, ids: &[u32]) -> Vec<u32> {
        ids.iter()
            .filter_map(|&id| {
                if id == UNK_PLACEHOLDER_ID {
                    return None;
                }
                match self.num_words {
                    Some(limit) if id >= limit => self.oov_id,
                    _ => Some(id),
                }
            })
            .collect()
    }
}

/// Word-to-index tokenizer loaded from the tokenizer artifact.
///
/// Two artifact formats are accepted:
/// - a Keras `Tokenizer.to_json()` export, rebuilt as a `WordLevel` pipeline
///   (lowercase, filter characters, split, vocabulary lookup);
/// - a native `tokenizers` JSON file, used as-is.
#[derive(Debug)]
pub struct VocabTokenizer {
    inner: Tokenizer,
    policy: Option<IndexPolicy>,
}

#[derive(Debug, Deserialize)]
struct KerasExport {
    config: KerasConfig,
}

#[derive(Debug, Deserialize)]
struct KerasConfig {
    #[serde(default)]
    num_words: Option<u32>,
    #[serde(default)]
    filters: Option<String>,
    #[serde(default = "default_lower")]
    lower: bool,
    #[serde(default)]
    split: Option<String>,
    #[serde(default)]
    char_level: bool,
    #[serde(default)]
    oov_token: Option<String>,
    word_index: Value,
}

fn default_lower() -> bool {
    true
}

impl VocabTokenizer {
    pub fn from_file(path: &Path) -> Result<Self, ClassifierError> {
        let json = fs::read_to_string(path)
            .map_err(|e| ClassifierError::TokenizerError(format!("Failed to read {:?}: {}", path, e)))?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ClassifierError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| ClassifierError::TokenizerError(format!("Invalid tokenizer JSON: {}", e)))?;

        let is_keras = value.get("class_name").and_then(Value::as_str) == Some("Tokenizer")
            || value.get("config").map_or(false, |c| c.get("word_index").is_some());

        if is_keras {
            let export: KerasExport = serde_json::from_value(value)
                .map_err(|e| ClassifierError::TokenizerError(format!("Invalid Keras tokenizer config: {}", e)))?;
            Self::from_keras(export.config)
        } else if value.get("model").is_some() {
            let inner = Tokenizer::from_str(json)
                .map_err(|e| ClassifierError::TokenizerError(e.to_string()))?;
            Ok(Self { inner, policy: None })
        } else {
            Err(ClassifierError::TokenizerError(
                "Unrecognised tokenizer format: expected a Keras export or a tokenizers JSON file".into()
            ))
        }
    }

    fn from_keras(config: KerasConfig) -> Result<Self, ClassifierError> {
        if config.char_level {
            return Err(ClassifierError::TokenizerError(
                "Character-level Keras tokenizers are not supported".into()
            ));
        }

        let mut vocab = decode_word_index(&config.word_index)?;
        if vocab.is_empty() {
            return Err(ClassifierError::TokenizerError("Tokenizer vocabulary is empty".into()));
        }

        let oov_id = config.oov_token.as_ref().and_then(|tok| vocab.get(tok).copied());
        let unk_token = match (&config.oov_token, oov_id) {
            (Some(tok), Some(_)) => tok.clone(),
            _ => {
                vocab.insert(UNK_PLACEHOLDER.to_string(), UNK_PLACEHOLDER_ID);
                UNK_PLACEHOLDER.to_string()
            }
        };
        let vocab_size = vocab.len();

        let model = WordLevel::builder()
            .vocab(vocab)
            .unk_token(unk_token)
            .build()
            .map_err(|e| ClassifierError::TokenizerError(format!("Failed to build vocabulary: {}", e)))?;

        let split = config.split.unwrap_or_else(|| " ".to_string());
        if split.is_empty() {
            return Err(ClassifierError::TokenizerError("Split string cannot be empty".into()));
        }
        let filters = config.filters.unwrap_or_else(|| KERAS_DEFAULT_FILTERS.to_string());

        let mut normalizers: Vec<NormalizerWrapper> = Vec::new();
        if config.lower {
            normalizers.push(NormalizerWrapper::Lowercase(Lowercase));
        }
        if !filters.is_empty() {
            let replace = Replace::new(ReplacePattern::Regex(filter_class(&filters)), split.clone())
                .map_err(|e| ClassifierError::TokenizerError(format!("Invalid filter characters: {}", e)))?;
            normalizers.push(NormalizerWrapper::Replace(replace));
        }

        // Only the literal split string separates words; other whitespace such as
        // '\r' stays part of the word, and empty pieces are discarded.
        let splitter = Split::new(SplitPattern::String(split), SplitDelimiterBehavior::Removed, false)
            .map_err(|e| ClassifierError::TokenizerError(format!("Invalid split string: {}", e)))?;
        let pre_tokenizer = PreTokenizerWrapper::Split(splitter);

        let mut inner = Tokenizer::new(ModelWrapper::WordLevel(model));
        inner.with_normalizer(NormalizerWrapper::Sequence(Sequence::new(normalizers)));
        inner.with_pre_tokenizer(pre_tokenizer);

        log::info!(
            "Keras tokenizer converted: {} words, num_words={:?}, oov_id={:?}",
            vocab_size, config.num_words, oov_id
        );

        Ok(Self {
            inner,
            policy: Some(IndexPolicy {
                num_words: config.num_words.filter(|&n| n > 0),
                oov_id,
            }),
        })
    }

    /// Converts text into vocabulary ids. Words outside the vocabulary follow the
    /// artifact's OOV policy: mapped to the OOV id when one exists, otherwise dropped.
    pub fn encode(&self, text: &str) -> Result<Vec<u32>, ClassifierError> {
        let encoding = self.inner.encode(text, false)
            .map_err(|e| ClassifierError::TokenizerError(e.to_string()))?;
        let ids = encoding.get_ids();

        Ok(match &self.policy {
            Some(policy) => policy.apply(ids),
            None => ids.to_vec(),
        })
    }

    pub fn vocab_size(&self) -> usize {
        self.inner.get_vocab_size(false)
    }
}

/// Keras stores `word_index` either as an object or as a JSON-encoded string of one.
fn decode_word_index(value: &Value) -> Result<HashMap<String, u32>, ClassifierError> {
    let parsed = match value {
        Value::String(encoded) => serde_json::from_str(encoded),
        other => serde_json::from_value(other.clone()),
    };
    parsed.map_err(|e| ClassifierError::TokenizerError(format!("Invalid word_index: {}", e)))
}

/// Builds a regex character class matching any of the filter characters.
fn filter_class(filters: &str) -> String {
    let mut class = String::with_capacity(filters.len() * 2 + 2);
    class.push('[');
    for c in filters.chars() {
        match c {
            '\t' => class.push_str("\\t"),
            '\n' => class.push_str("\\n"),
            '\r' => class.push_str("\\r"),
            c if c.is_ascii_punctuation() => {
                class.push('\\');
                class.push(c);
            }
            c => class.push(c),
        }
    }
    class.push(']');
    class
}
