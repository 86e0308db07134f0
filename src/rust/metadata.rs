use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use serde::Deserialize;

/// Padding length used when the metadata file does not provide a usable `max_sequence`.
pub const DEFAULT_MAX_SEQUENCE: usize = 280;

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Invalid metadata JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Metadata is missing the `labels_legend_inverted` mapping")]
    MissingLegend,
    #[error("`labels_legend_inverted` is empty")]
    EmptyLegend,
    #[error("`labels_legend_inverted` has no label for class index {0}")]
    LegendGap(usize),
}

#[derive(Debug, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    max_sequence: Option<u64>,
    #[serde(default)]
    labels_legend_inverted: Option<HashMap<String, String>>,
}

/// Model metadata with the label legend resolved into class-index order.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMetadata {
    pub max_sequence: usize,
    pub labels: Vec<String>,
}

impl ModelMetadata {
    pub fn from_file(path: &Path) -> Result<Self, MetadataError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parses metadata JSON. A missing, `null` or zero `max_sequence` falls back to
    /// [`DEFAULT_MAX_SEQUENCE`]. Legend keys must cover `"0"..."n-1"` with no gaps.
    pub fn from_json(json: &str) -> Result<Self, MetadataError> {
        let raw: RawMetadata = serde_json::from_str(json)?;

        let max_sequence = match raw.max_sequence {
            Some(n) if n > 0 => usize::try_from(n).unwrap_or(usize::MAX),
            _ => DEFAULT_MAX_SEQUENCE,
        };

        let legend = raw.labels_legend_inverted.ok_or(MetadataError::MissingLegend)?;
        if legend.is_empty() {
            return Err(MetadataError::EmptyLegend);
        }

        let labels = (0..legend.len())
            .map(|idx| {
                legend.get(&idx.to_string())
                    .cloned()
                    .ok_or(MetadataError::LegendGap(idx))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { max_sequence, labels })
    }

    pub fn num_classes(&self) -> usize {
        self.labels.len()
    }

    pub fn label(&self, class_index: usize) -> Option<&str> {
        self.labels.get(class_index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_legend_in_index_order() {
        let meta = ModelMetadata::from_json(r#"{
            "max_sequence": 300,
            "labels_legend": {"ham": 0, "spam": 1},
            "labels_legend_inverted": {"1": "spam", "0": "ham"}
        }"#).unwrap();

        assert_eq!(meta.max_sequence, 300);
        assert_eq!(meta.labels, vec!["ham", "spam"]);
        assert_eq!(meta.num_classes(), 2);
        assert_eq!(meta.label(1), Some("spam"));
        assert_eq!(meta.label(2), None);
    }

    #[test]
    fn test_max_sequence_defaults() {
        let legend = r#""labels_legend_inverted": {"0": "ham", "1": "spam"}"#;

        let missing = ModelMetadata::from_json(&format!("{{{}}}", legend)).unwrap();
        assert_eq!(missing.max_sequence, DEFAULT_MAX_SEQUENCE);

        let null = ModelMetadata::from_json(&format!(r#"{{"max_sequence": null, {}}}"#, legend)).unwrap();
        assert_eq!(null.max_sequence, DEFAULT_MAX_SEQUENCE);

        let zero = ModelMetadata::from_json(&format!(r#"{{"max_sequence": 0, {}}}"#, legend)).unwrap();
        assert_eq!(zero.max_sequence, DEFAULT_MAX_SEQUENCE);
    }

    #[test]
    fn test_missing_legend_is_an_error() {
        let err = ModelMetadata::from_json(r#"{"max_sequence": 280}"#).unwrap_err();
        assert!(matches!(err, MetadataError::MissingLegend));

        let err = ModelMetadata::from_json(r#"{"labels_legend_inverted": {}}"#).unwrap_err();
        assert!(matches!(err, MetadataError::EmptyLegend));
    }

    #[test]
    fn test_legend_gap_is_an_error() {
        let err = ModelMetadata::from_json(r#"{"labels_legend_inverted": {"0": "ham", "2": "spam"}}"#)
            .unwrap_err();
        assert!(matches!(err, MetadataError::LegendGap(1)));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            ModelMetadata::from_json("not json").unwrap_err(),
            MetadataError::Json(_)
        ));
    }
}
