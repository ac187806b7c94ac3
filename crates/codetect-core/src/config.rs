//! Application configuration loaded once at startup.
//!
//! The config file is YAML and names the three artifacts the classifier
//! needs (ONNX model, tokenizer, label map) plus the maximum sequence
//! length fed to the model.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Sequence length used when the config file does not set one.
pub const DEFAULT_MAX_SEQ_LEN: usize = 512;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Startup configuration: artifact locations and the model input length.
///
/// Paths are resolved relative to the working directory. Existence is
/// checked when the artifacts are opened, not at parse time.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Serialized classification model (`.onnx`).
    pub model_path: PathBuf,

    /// HuggingFace `tokenizer.json` file.
    pub tokenizer_path: PathBuf,

    /// JSON object mapping language labels to class indices.
    pub labels_path: PathBuf,

    /// Fixed input length for the model (tokens, including the leading
    /// classification token).
    #[serde(default = "default_max_seq_len")]
    pub max_seq_len: usize,
}

fn default_max_seq_len() -> usize {
    DEFAULT_MAX_SEQ_LEN
}

impl AppConfig {
    /// Read and parse a YAML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), max_seq_len = config.max_seq_len, "loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let yaml = "\
model_path: models/classifier.onnx
tokenizer_path: models/tokenizer.json
labels_path: models/labels.json
max_seq_len: 256
";
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.model_path, PathBuf::from("models/classifier.onnx"));
        assert_eq!(config.max_seq_len, 256);
    }

    #[test]
    fn max_seq_len_defaults_to_512() {
        let yaml = "\
model_path: m.onnx
tokenizer_path: t.json
labels_path: l.json
";
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.max_seq_len, DEFAULT_MAX_SEQ_LEN);
    }

    #[test]
    fn from_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codetect.yaml");
        std::fs::write(
            &path,
            "model_path: m.onnx\ntokenizer_path: t.json\nlabels_path: l.json\n",
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.labels_path, PathBuf::from("l.json"));
        assert_eq!(config.max_seq_len, 512);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = AppConfig::from_file(Path::new("/nonexistent/codetect.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "model_path: [unclosed").unwrap();

        let err = AppConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
