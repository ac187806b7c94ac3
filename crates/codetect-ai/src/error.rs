use thiserror::Error;

/// Errors raised on the inference path. Artifact-load failures are fatal at
/// startup and reported through `anyhow` at the load seams instead.
#[derive(Debug, Error)]
pub enum InferError {
    /// Input could not be tokenized.
    #[error("tokenization failed: {0}")]
    Tokenize(String),

    /// The evaluation backend failed at runtime.
    #[error("model evaluation failed: {0}")]
    Model(#[from] ort::Error),

    /// The model output was not a `[1, num_classes]` score matrix.
    #[error("unexpected model output shape {dims:?}, expected [1, num_classes]")]
    OutputShape { dims: Vec<i64> },

    /// The model returned an empty score vector.
    #[error("model returned no class scores")]
    NoScores,

    /// The predicted class index is absent from the label map.
    #[error("no label mapped to predicted class index {0}")]
    UnknownClass(usize),
}
