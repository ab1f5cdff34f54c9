//! Character vocabulary for the transformer.
//!
//! A [`CharVocab`] is built from a corpus by lower-casing it and collecting the
//! distinct characters in ascending order; each character's position in that
//! list is its token index. Encoding applies the same case folding, so
//! `decode(encode(s)) == s.to_lowercase()` for any `s` drawn from the corpus
//! alphabet.
//!
//! Vocabularies persist as JSON so a model can be paired with the alphabet it
//! was built against.

pub mod errors;
pub mod vocab;

pub use errors::{Result, VocabError};
pub use vocab::CharVocab;
