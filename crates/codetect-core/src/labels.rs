//! Language label map: human-readable names to model class indices.
//!
//! The map is persisted as a JSON object (`{"python": 1, "go": 0, ...}`),
//! loaded once at startup, and read-only afterwards. At inference time it is
//! used in reverse: the model's arg-max index is looked up to recover the
//! language name.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum LabelError {
    #[error("cannot read label map {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid label map {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("label map is empty")]
    Empty,
    #[error("labels '{first}' and '{second}' both map to class index {index}")]
    DuplicateIndex {
        first: String,
        second: String,
        index: usize,
    },
}

/// Bidirectional label map, validated at construction.
///
/// Every class index maps to exactly one label. A duplicate index in the
/// artifact is a configuration defect and is rejected at load rather than
/// resolved by first-match at inference time.
#[derive(Debug)]
pub struct LabelMap {
    by_label: BTreeMap<String, usize>,
    by_index: BTreeMap<usize, String>,
}

impl LabelMap {
    /// Build a label map, checking it is non-empty and injective.
    pub fn new(by_label: BTreeMap<String, usize>) -> Result<Self, LabelError> {
        if by_label.is_empty() {
            return Err(LabelError::Empty);
        }

        let mut by_index = BTreeMap::new();
        for (label, &index) in &by_label {
            if let Some(existing) = by_index.insert(index, label.clone()) {
                return Err(LabelError::DuplicateIndex {
                    first: existing,
                    second: label.clone(),
                    index,
                });
            }
        }

        Ok(Self { by_label, by_index })
    }

    /// Load and validate a label map from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, LabelError> {
        let raw = std::fs::read_to_string(path).map_err(|source| LabelError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let by_label: BTreeMap<String, usize> =
            serde_json::from_str(&raw).map_err(|source| LabelError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let map = Self::new(by_label)?;
        info!(path = %path.display(), classes = map.len(), "loaded label map");
        Ok(map)
    }

    /// Class index for a label.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.by_label.get(label).copied()
    }

    /// Label for a class index. `None` means the model produced an index
    /// the artifact does not cover.
    pub fn label_for(&self, index: usize) -> Option<&str> {
        self.by_index.get(&index).map(|s| s.as_str())
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.by_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }

    /// Iterate `(index, label)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.by_index.iter().map(|(&i, l)| (i, l.as_str()))
    }
}
