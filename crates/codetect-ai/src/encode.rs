//! Snippet encoding: raw text to fixed-length model input.
//!
//! # Algorithm
//!
//! 1. Tokenize the snippet and join the spellings with single spaces.
//! 2. Optionally (`use_partial`) keep only a uniformly random contiguous
//!    range of lines, split on the tokenizer's newline spelling.
//! 3. Convert spellings to ids (unknown spelling → unknown id), prepend the
//!    classification id, truncate to `max_len`, right-pad with the pad id.
//! 4. Mask positions: 1 where the id is not the pad id, 0 elsewhere.
//! 5. Optionally (`dropout_ratio` > 0) swap real token ids for the unknown
//!    id, never touching positions holding the pad or classification id.
//!
//! Steps 2 and 5 draw from a caller-supplied [`Rng`], so deterministic tests
//! seed their own generator.

use rand::Rng;

use crate::error::InferError;
use crate::vocab::{SpecialTokens, Vocab};

/// Fixed-length model input for one snippet.
///
/// Both vectors have exactly the requested length, and
/// `attention_mask[i] == 1` iff `input_ids[i]` is not the pad id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding {
    pub input_ids: Vec<i64>,
    pub attention_mask: Vec<i64>,
}

/// Encoding knobs. Production inference uses the deterministic settings;
/// the augmentation fields exist for a training-time counterpart.
#[derive(Debug, Clone)]
pub struct EncodeOptions {
    /// Output length in tokens, including the leading classification token.
    pub max_len: usize,

    /// Per-position probability of swapping a real token id for the
    /// unknown id. Must be within `[0, 1]`.
    pub dropout_ratio: f64,

    /// Encode a random contiguous line range instead of the whole snippet.
    pub use_partial: bool,
}

impl EncodeOptions {
    /// Deterministic full-text options used by the production path.
    pub fn inference(max_len: usize) -> Self {
        Self {
            max_len,
            dropout_ratio: 0.0,
            use_partial: false,
        }
    }
}

/// Encode a snippet into fixed-length `input_ids` and `attention_mask`.
pub fn encode_snippet<V: Vocab, R: Rng>(
    vocab: &V,
    specials: &SpecialTokens,
    text: &str,
    opts: &EncodeOptions,
    rng: &mut R,
) -> Result<Encoding, InferError> {
    debug_assert!(
        (0.0..=1.0).contains(&opts.dropout_ratio),
        "dropout ratio must be a probability"
    );

    let mut stream = vocab.tokenize(text)?.join(" ");

    if opts.use_partial {
        let selected = {
            let lines: Vec<&str> = stream.split(specials.newline.as_str()).collect();
            let start = rng.gen_range(0..lines.len());
            let end = rng.gen_range(start + 1..=lines.len());
            lines[start..end].join(specials.newline.as_str())
        };
        stream = selected.trim().to_string();
    }

    let mut input_ids: Vec<i64> = Vec::with_capacity(opts.max_len.max(1));
    input_ids.push(specials.cls_id);
    for token in stream.split(' ') {
        let id = vocab
            .token_to_id(token)
            .map(i64::from)
            .unwrap_or(specials.unk_id);
        input_ids.push(id);
    }
    input_ids.truncate(opts.max_len);
    input_ids.resize(opts.max_len, specials.pad_id);

    // Dropout below only ever swaps a real token for the unknown id, which
    // is still non-pad, so the mask can be built first.
    let attention_mask: Vec<i64> = input_ids
        .iter()
        .map(|&id| i64::from(id != specials.pad_id))
        .collect();

    if opts.dropout_ratio > 0.0 {
        for id in &mut input_ids {
            if *id != specials.pad_id && *id != specials.cls_id && rng.gen_bool(opts.dropout_ratio)
            {
                *id = specials.unk_id;
            }
        }
    }

    Ok(Encoding {
        input_ids,
        attention_mask,
    })
}
