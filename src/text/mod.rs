//! Text analysis: normalization, tokenization, and synonym expansion

mod synonyms;
mod tokenizer;

pub use synonyms::{expand_query, expand_term, SYNONYM_GROUPS};
pub use tokenizer::tokenize;
