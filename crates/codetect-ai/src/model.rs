//! Score-model capability and its ONNX Runtime implementation.

use std::path::Path;

use ort::session::Session;
use ort::value::Tensor;
use tracing::info;

use crate::encode::Encoding;
use crate::error::InferError;

/// Evaluation interface the classifier needs from a model: score one
/// encoded snippet.
///
/// `&mut self` because the production runtime requires exclusive access to
/// its session for a run.
pub trait ScoreModel {
    /// Class scores for a single encoding.
    fn evaluate(&mut self, encoding: &Encoding) -> Result<Vec<f32>, InferError>;
}

/// Serialized classification graph run through ONNX Runtime.
///
/// The graph takes two `[1, L]` i64 tensors named `input_ids` and
/// `attention_mask` and returns a `[1, num_classes]` f32 score row.
pub struct OnnxModel {
    session: Session,
}

impl OnnxModel {
    /// Load a serialized model from disk.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        anyhow::ensure!(path.exists(), "model file not found: {}", path.display());

        let session = Session::builder()?.commit_from_file(path)?;

        info!(model = %path.display(), "loaded classification model");
        Ok(Self { session })
    }
}

impl ScoreModel for OnnxModel {
    fn evaluate(&mut self, encoding: &Encoding) -> Result<Vec<f32>, InferError> {
        let seq_len = encoding.input_ids.len();
        let shape = [1i64, seq_len as i64];

        let ids_tensor =
            Tensor::from_array((shape, encoding.input_ids.clone().into_boxed_slice()))?;
        let mask_tensor =
            Tensor::from_array((shape, encoding.attention_mask.clone().into_boxed_slice()))?;

        let outputs = self.session.run(ort::inputs![
            "input_ids" => ids_tensor,
            "attention_mask" => mask_tensor,
        ])?;

        let (output_shape, output_data) = outputs[0].try_extract_tensor::<f32>()?;
        let dims: &[i64] = output_shape;
        if dims.len() != 2 || dims[0] != 1 {
            return Err(InferError::OutputShape {
                dims: dims.to_vec(),
            });
        }

        Ok(output_data.to_vec())
    }
}
