use spam_sms::{pad_sequence, ModelMetadata, VocabTokenizer, DEFAULT_MAX_SEQUENCE};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn scratch_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_keras_export_from_file() {
    // Keras writes dict-valued fields as JSON strings
    let file = scratch_file(r##"{
        "class_name": "Tokenizer",
        "config": {
            "num_words": null,
            "filters": "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n",
            "lower": true,
            "split": " ",
            "char_level": false,
            "oov_token": null,
            "document_count": 3,
            "word_counts": "{\"call\": 2, \"now\": 1}",
            "index_word": "{\"1\": \"call\", \"2\": \"now\", \"3\": \"txt\"}",
            "word_index": "{\"call\": 1, \"now\": 2, \"txt\": 3}"
        }
    }"##);

    let tokenizer = VocabTokenizer::from_file(file.path()).unwrap();
    assert_eq!(tokenizer.encode("Call NOW... or txt!").unwrap(), vec![1, 2, 3]);
    assert_eq!(
        pad_sequence(&tokenizer.encode("call now").unwrap(), 5),
        vec![0, 0, 0, 1, 2]
    );
}

#[test]
fn test_missing_tokenizer_file() {
    assert!(VocabTokenizer::from_file(&PathBuf::from("/nonexistent/tokenizer.json")).is_err());
}

#[test]
fn test_metadata_from_file() {
    let file = scratch_file(r#"{
        "labels_legend_inverted": {"0": "ham", "1": "spam"},
        "legend": {"ham": 0, "spam": 1}
    }"#);

    let metadata = ModelMetadata::from_file(file.path()).unwrap();
    assert_eq!(metadata.max_sequence, DEFAULT_MAX_SEQUENCE);
    assert_eq!(metadata.labels, vec!["ham", "spam"]);
}
