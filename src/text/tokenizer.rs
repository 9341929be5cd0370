//! Normalizer/Tokenizer
//!
//! Turns raw text into the canonical index-term sequence: NFKC
//! normalization, lowercasing, splitting on non-alphanumeric boundaries,
//! and a Porter-style English stemming pass so morphological variants
//! collapse to one term. The same function runs on the write path and the
//! query path, which is what makes verbatim field terms searchable.

use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)[\p{L}\p{N}]+").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
}

/// Tokenize text into stemmed, lowercased terms.
///
/// Stable: the same input always yields the same sequence. Empty or
/// whitespace-only input yields an empty sequence.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    RE.find_iter(&normalized)
        .map(|mat| STEMMER.stem(mat.as_str()).to_string())
        .collect()
}
