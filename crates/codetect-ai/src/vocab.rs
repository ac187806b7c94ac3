//! Tokenizer capability and its HuggingFace-backed implementation.
//!
//! The encoder only needs two things from a tokenizer: the spellings a text
//! splits into, and the id of a spelling. Everything else (special ids, the
//! newline spelling) is derived once at startup into [`SpecialTokens`].

use std::path::Path;

use tokenizers::Tokenizer;
use tracing::info;

use crate::error::InferError;

/// Vocabulary interface the encoder needs from a tokenizer.
pub trait Vocab {
    /// Split text into token spellings.
    fn tokenize(&self, text: &str) -> Result<Vec<String>, InferError>;

    /// Id for a token spelling, if it is in the vocabulary.
    fn token_to_id(&self, token: &str) -> Option<u32>;
}

/// Special token ids and the newline spelling, derived from a vocabulary
/// once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct SpecialTokens {
    /// Classification-start token id, prepended to every sequence.
    pub cls_id: i64,
    /// Padding token id, used to right-fill up to the fixed length.
    pub pad_id: i64,
    /// Unknown token id, the fallback for out-of-vocabulary spellings.
    pub unk_id: i64,
    /// Spelling the tokenizer gives a newline (e.g. `Ċ` for byte-level BPE).
    pub newline: String,
}

const CLS_SPELLINGS: &[&str] = &["<s>", "[CLS]"];
const PAD_SPELLINGS: &[&str] = &["<pad>", "[PAD]"];
const UNK_SPELLINGS: &[&str] = &["<unk>", "[UNK]"];

impl SpecialTokens {
    /// Probe a vocabulary for the classification, padding, and unknown ids,
    /// and derive the newline-token spelling.
    ///
    /// A vocabulary missing any of the three specials cannot drive this
    /// model family, so detection failure is a startup error.
    pub fn detect<V: Vocab>(vocab: &V) -> anyhow::Result<Self> {
        let cls_id = find_id(vocab, CLS_SPELLINGS).ok_or_else(|| {
            anyhow::anyhow!("no classification token in vocabulary (tried {CLS_SPELLINGS:?})")
        })?;
        let pad_id = find_id(vocab, PAD_SPELLINGS).ok_or_else(|| {
            anyhow::anyhow!("no padding token in vocabulary (tried {PAD_SPELLINGS:?})")
        })?;
        let unk_id = find_id(vocab, UNK_SPELLINGS).ok_or_else(|| {
            anyhow::anyhow!("no unknown token in vocabulary (tried {UNK_SPELLINGS:?})")
        })?;

        let newline = vocab
            .tokenize("\n")?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("tokenizer produced no token for a newline"))?;

        Ok(Self {
            cls_id,
            pad_id,
            unk_id,
            newline,
        })
    }
}

fn find_id<V: Vocab>(vocab: &V, spellings: &[&str]) -> Option<i64> {
    spellings
        .iter()
        .find_map(|s| vocab.token_to_id(s))
        .map(i64::from)
}

/// `tokenizers`-backed vocabulary loaded from a `tokenizer.json` file.
pub struct HfVocab {
    inner: Tokenizer,
}

impl HfVocab {
    /// Load a tokenizer artifact from disk.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let inner = Tokenizer::from_file(path)
            .map_err(|e| anyhow::anyhow!("load tokenizer {}: {e}", path.display()))?;
        info!(path = %path.display(), "loaded tokenizer");
        Ok(Self { inner })
    }
}

impl Vocab for HfVocab {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, InferError> {
        // No special tokens here: the encoder prepends the classification
        // id itself and never wants a trailing separator.
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| InferError::Tokenize(e.to_string()))?;
        Ok(encoding.get_tokens().to_vec())
    }

    fn token_to_id(&self, token: &str) -> Option<u32> {
        self.inner.token_to_id(token)
    }
}
