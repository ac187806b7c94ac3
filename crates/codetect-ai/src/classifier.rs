//! Programming-language classification over a serialized model.
//!
//! The classifier owns the loaded artifacts for the process lifetime and is
//! generic over the [`Vocab`] and [`ScoreModel`] capabilities so tests can
//! substitute either.

use std::time::{Duration, Instant};

use codetect_core::{AppConfig, LabelMap};
use tracing::info;

use crate::encode::{EncodeOptions, encode_snippet};
use crate::error::InferError;
use crate::model::{OnnxModel, ScoreModel};
use crate::vocab::{HfVocab, SpecialTokens, Vocab};

/// Outcome of classifying one snippet.
#[derive(Debug, Clone)]
pub struct Prediction {
    /// Arg-max class index from the model's score vector.
    pub class_index: usize,
    /// Language name the label map assigns to that index.
    pub label: String,
    /// Wall-clock time for encoding plus model evaluation.
    pub elapsed: Duration,
}

/// Language classifier: vocabulary, derived special ids, model, label map.
///
/// Constructed once at startup; everything except the model session is
/// read-only afterwards.
pub struct Classifier<V, M> {
    vocab: V,
    specials: SpecialTokens,
    model: M,
    labels: LabelMap,
    max_seq_len: usize,
}

impl Classifier<HfVocab, OnnxModel> {
    /// Load the production classifier from configured artifacts.
    ///
    /// Any failure here is fatal: the process must not serve requests with
    /// a partially loaded pipeline.
    pub fn load(config: &AppConfig) -> anyhow::Result<Self> {
        let vocab = HfVocab::from_file(&config.tokenizer_path)?;
        let model = OnnxModel::load(&config.model_path)?;
        let labels = LabelMap::from_file(&config.labels_path)?;

        Self::new(vocab, model, labels, config.max_seq_len)
    }
}

impl<V: Vocab, M: ScoreModel> Classifier<V, M> {
    /// Assemble a classifier, deriving the special ids from the vocabulary.
    pub fn new(vocab: V, model: M, labels: LabelMap, max_seq_len: usize) -> anyhow::Result<Self> {
        let specials = SpecialTokens::detect(&vocab)?;
        info!(
            classes = labels.len(),
            max_seq_len, "classifier ready"
        );

        Ok(Self {
            vocab,
            specials,
            model,
            labels,
            max_seq_len,
        })
    }

    /// Classify one snippet: deterministic full-text encoding, batch of
    /// one, arg-max over the score vector, reverse label lookup.
    ///
    /// The elapsed time covers encoding and model evaluation; the label
    /// lookup happens outside the timed window.
    pub fn classify(&mut self, text: &str) -> Result<Prediction, InferError> {
        let opts = EncodeOptions::inference(self.max_seq_len);
        let mut rng = rand::thread_rng();

        let start = Instant::now();
        let encoding = encode_snippet(&self.vocab, &self.specials, text, &opts, &mut rng)?;
        let scores = self.model.evaluate(&encoding)?;
        let class_index = argmax(&scores).ok_or(InferError::NoScores)?;
        let elapsed = start.elapsed();

        let label = self
            .labels
            .label_for(class_index)
            .ok_or(InferError::UnknownClass(class_index))?
            .to_string();

        Ok(Prediction {
            class_index,
            label,
            elapsed,
        })
    }

    /// The loaded label map.
    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }
}

/// Index of the first maximum score.
fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best_idx = None;
    let mut best = f32::NEG_INFINITY;

    for (i, &score) in scores.iter().enumerate() {
        if score > best {
            best = score;
            best_idx = Some(i);
        }
    }

    best_idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::Encoding;
    use std::collections::BTreeMap;

    /// Minimal vocabulary carrying only the specials plus a couple of words.
    struct StubVocab;

    impl Vocab for StubVocab {
        fn tokenize(&self, text: &str) -> Result<Vec<String>, InferError> {
            Ok(text
                .replace('\n', " \u{010a} ")
                .split_whitespace()
                .map(String::from)
                .collect())
        }

        fn token_to_id(&self, token: &str) -> Option<u32> {
            match token {
                "<s>" => Some(0),
                "<pad>" => Some(1),
                "<unk>" => Some(3),
                "\u{010a}" => Some(4),
                "print" => Some(5),
                "import" => Some(6),
                _ => None,
            }
        }
    }

    /// Model stub that returns the same score vector for any input.
    struct FixedModel {
        scores: Vec<f32>,
    }

    impl ScoreModel for FixedModel {
        fn evaluate(&mut self, _encoding: &Encoding) -> Result<Vec<f32>, InferError> {
            Ok(self.scores.clone())
        }
    }

    fn label_map(pairs: &[(&str, usize)]) -> LabelMap {
        let by_label: BTreeMap<String, usize> = pairs
            .iter()
            .map(|&(l, i)| (l.to_string(), i))
            .collect();
        LabelMap::new(by_label).unwrap()
    }

    fn classifier(scores: Vec<f32>, labels: LabelMap) -> Classifier<StubVocab, FixedModel> {
        Classifier::new(StubVocab, FixedModel { scores }, labels, 512).unwrap()
    }

    #[test]
    fn predicts_argmax_class_and_label() {
        let labels = label_map(&[("python", 1), ("go", 0), ("rust", 2)]);
        let mut clf = classifier(vec![0.1, 0.9, 0.0], labels);

        let prediction = clf.classify("import os\nprint ( )").unwrap();
        assert_eq!(prediction.class_index, 1);
        assert_eq!(prediction.label, "python");
    }

    #[test]
    fn missing_label_is_a_lookup_error() {
        // The model can produce index 1, but the map does not cover it.
        let labels = label_map(&[("go", 0), ("rust", 2)]);
        let mut clf = classifier(vec![0.1, 0.9, 0.0], labels);

        let err = clf.classify("print").unwrap_err();
        assert!(matches!(err, InferError::UnknownClass(1)));
    }

    #[test]
    fn elapsed_time_is_non_negative() {
        let labels = label_map(&[("python", 0)]);
        let mut clf = classifier(vec![0.5], labels);

        let prediction = clf.classify("print").unwrap();
        assert!(prediction.elapsed >= Duration::ZERO);
    }

    #[test]
    fn tie_goes_to_the_first_class() {
        let labels = label_map(&[("go", 0), ("python", 1)]);
        let mut clf = classifier(vec![0.5, 0.5], labels);

        let prediction = clf.classify("print").unwrap();
        assert_eq!(prediction.class_index, 0);
        assert_eq!(prediction.label, "go");
    }

    #[test]
    fn empty_score_vector_is_rejected() {
        let labels = label_map(&[("go", 0)]);
        let mut clf = classifier(vec![], labels);

        let err = clf.classify("print").unwrap_err();
        assert!(matches!(err, InferError::NoScores));
    }

    #[test]
    fn argmax_picks_first_maximum() {
        assert_eq!(argmax(&[0.1, 0.9, 0.0]), Some(1));
        assert_eq!(argmax(&[2.0, 2.0]), Some(0));
        assert_eq!(argmax(&[]), None);
        assert_eq!(argmax(&[-3.0, -1.0, -2.0]), Some(1));
    }
}
