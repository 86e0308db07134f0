use spam_sms::{ArtifactPaths, Classifier, ClassifierError};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

/// Real artifacts are not checked in; tests that need them skip when they are absent.
fn models_dir() -> PathBuf {
    std::env::var("SPAM_SMS_MODELS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("models"))
}

fn setup_test_classifier() -> Option<Classifier> {
    let paths = ArtifactPaths::new(models_dir());
    if !paths.is_complete() {
        eprintln!("skipping: artifacts missing under {:?}", paths.models_dir());
        return None;
    }
    Some(Classifier::builder()
        .with_artifact_paths(&paths)
        .build()
        .expect("Failed to create classifier"))
}

#[test]
fn test_missing_artifacts_fail_at_startup() {
    let result = Classifier::builder()
        .with_models_dir("/nonexistent/spam-sms-models")
        .build();
    match result {
        Err(ClassifierError::BuildError(msg)) => assert!(msg.contains("spam-model.onnx")),
        other => panic!("expected a build error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_spam_message() -> Result<(), Box<dyn std::error::Error>> {
    let Some(classifier) = setup_test_classifier() else { return Ok(()) };

    let prediction = classifier.predict("WIN A FREE PRIZE NOW")?;
    assert_eq!(prediction.top.label, "spam");
    assert!(prediction.top.confidence > 0.5);
    Ok(())
}

#[test]
fn test_prediction_covers_every_label() -> Result<(), Box<dyn std::error::Error>> {
    let Some(classifier) = setup_test_classifier() else { return Ok(()) };
    let info = classifier.info();

    let prediction = classifier.predict("Hello World")?;
    assert_eq!(prediction.predictions.len(), info.num_classes);
    for (score, label) in prediction.predictions.iter().zip(&info.class_labels) {
        assert_eq!(&score.label, label);
        assert!((0.0..=1.0).contains(&score.confidence));
    }
    assert!(prediction.predictions.iter().all(|s| s.confidence <= prediction.top.confidence));
    Ok(())
}

#[test]
fn test_inference_is_deterministic() -> Result<(), Box<dyn std::error::Error>> {
    let Some(classifier) = setup_test_classifier() else { return Ok(()) };

    let first = classifier.predict("Are we still meeting for lunch tomorrow?")?;
    let second = classifier.predict("Are we still meeting for lunch tomorrow?")?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_long_and_empty_inputs() -> Result<(), Box<dyn std::error::Error>> {
    let Some(classifier) = setup_test_classifier() else { return Ok(()) };

    let long_text = "claim your free prize now ".repeat(200);
    assert!(classifier.tokenize(&long_text)?.len() > classifier.info().max_sequence);
    assert!(classifier.predict(&long_text).is_ok());

    assert!(classifier.predict("").is_ok());
    Ok(())
}

#[test]
fn test_thread_safety() {
    let Some(classifier) = setup_test_classifier() else { return };
    let classifier = Arc::new(classifier);
    let expected = classifier.predict("test text").unwrap();
    let mut handles = vec![];

    for _ in 0..3 {
        let classifier = Arc::clone(&classifier);
        let expected = expected.clone();
        handles.push(thread::spawn(move || {
            assert_eq!(classifier.predict("test text").unwrap(), expected);
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
}
