//! Inference layer: snippet encoding and serialized-model classification.
//!
//! The pipeline is deliberately thin: a [`Vocab`] turns raw text into
//! token ids, [`encode_snippet`] shapes them into fixed-length model input,
//! and a [`ScoreModel`] maps that input to class scores. [`Classifier`]
//! wires the three together with a [`codetect_core::LabelMap`] to recover
//! the language name from the arg-max class index.

pub mod classifier;
pub mod encode;
pub mod error;
pub mod model;
pub mod vocab;

pub use classifier::{Classifier, Prediction};
pub use encode::{EncodeOptions, Encoding, encode_snippet};
pub use error::InferError;
pub use model::{OnnxModel, ScoreModel};
pub use vocab::{HfVocab, SpecialTokens, Vocab};
