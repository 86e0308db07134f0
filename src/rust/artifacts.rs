use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use sha2::{Sha256, Digest};

/// Sub-directory of the models directory holding the spam classifier artifacts.
pub const SPAM_SMS_DIR: &str = "spam-sms";
pub const MODEL_FILE: &str = "spam-model.onnx";
pub const TOKENIZER_FILE: &str = "spam-classifer-tokenizer.json";
pub const METADATA_FILE: &str = "spam-classifer-metadata.json";

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Missing model artifacts: {}", format_paths(.0))]
    Missing(Vec<PathBuf>),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths.iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Fixed on-disk layout of the three artifacts the classifier is built from.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    models_dir: PathBuf,
}

impl ArtifactPaths {
    pub fn new<P: AsRef<Path>>(models_dir: P) -> Self {
        Self {
            models_dir: models_dir.as_ref().to_path_buf(),
        }
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    pub fn get_model_path(&self) -> PathBuf {
        self.models_dir.join(SPAM_SMS_DIR).join(MODEL_FILE)
    }

    pub fn get_tokenizer_path(&self) -> PathBuf {
        self.models_dir.join(SPAM_SMS_DIR).join(TOKENIZER_FILE)
    }

    pub fn get_metadata_path(&self) -> PathBuf {
        self.models_dir.join(SPAM_SMS_DIR).join(METADATA_FILE)
    }

    /// Returns every artifact path that does not exist, in model, tokenizer, metadata order.
    pub fn missing(&self) -> Vec<PathBuf> {
        missing_paths(&[
            &self.get_model_path(),
            &self.get_tokenizer_path(),
            &self.get_metadata_path(),
        ])
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    pub fn ensure_present(&self) -> Result<(), ArtifactError> {
        ensure_exist(&[
            &self.get_model_path(),
            &self.get_tokenizer_path(),
            &self.get_metadata_path(),
        ])
    }
}

/// Returns the paths that do not exist, keeping their order.
pub fn missing_paths(paths: &[&Path]) -> Vec<PathBuf> {
    paths.iter()
        .inspect(|p| log::debug!("Artifact {:?} (exists: {})", p, p.exists()))
        .filter(|p| !p.exists())
        .map(|p| p.to_path_buf())
        .collect()
}

/// Fails with [`ArtifactError::Missing`] naming every path that does not exist.
pub fn ensure_exist(paths: &[&Path]) -> Result<(), ArtifactError> {
    let missing = missing_paths(paths);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ArtifactError::Missing(missing))
    }
}

/// SHA-256 of a file as lowercase hex.
pub fn fingerprint(path: &Path) -> Result<String, ArtifactError> {
    let bytes = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn scratch_dir() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(SPAM_SMS_DIR)).unwrap();
        dir
    }

    #[test]
    fn test_layout() {
        let paths = ArtifactPaths::new("/srv/models");
        assert_eq!(paths.get_model_path(), PathBuf::from("/srv/models/spam-sms/spam-model.onnx"));
        assert_eq!(
            paths.get_tokenizer_path(),
            PathBuf::from("/srv/models/spam-sms/spam-classifer-tokenizer.json")
        );
        assert_eq!(
            paths.get_metadata_path(),
            PathBuf::from("/srv/models/spam-sms/spam-classifer-metadata.json")
        );
    }

    #[test]
    fn test_missing_lists_every_absent_file() {
        let dir = scratch_dir();
        let paths = ArtifactPaths::new(dir.path());
        fs::write(paths.get_metadata_path(), "{}").unwrap();

        let missing = paths.missing();
        assert_eq!(missing, vec![paths.get_model_path(), paths.get_tokenizer_path()]);
        assert!(!paths.is_complete());

        let err = paths.ensure_present().unwrap_err();
        let message = err.to_string();
        assert!(message.contains(MODEL_FILE));
        assert!(message.contains(TOKENIZER_FILE));
        assert!(!message.contains(METADATA_FILE));
    }

    #[test]
    fn test_ensure_exist_names_only_absent_paths() {
        let dir = scratch_dir();
        let present = dir.path().join("model.onnx");
        let absent = dir.path().join("tokenizer.json");
        fs::write(&present, "onnx").unwrap();

        assert_eq!(missing_paths(&[&present, &absent]), vec![absent.clone()]);
        assert!(ensure_exist(&[&present]).is_ok());
        match ensure_exist(&[&present, &absent]) {
            Err(ArtifactError::Missing(paths)) => assert_eq!(paths, vec![absent]),
            other => panic!("expected missing artifacts, got {:?}", other),
        }
    }

    #[test]
    fn test_fingerprint() {
        let dir = scratch_dir();
        let file = dir.path().join("blob.bin");
        fs::write(&file, "abc").unwrap();

        assert_eq!(
            fingerprint(&file).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert!(fingerprint(&dir.path().join("absent.bin")).is_err());
    }
}
