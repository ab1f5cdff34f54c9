//! Embedding crate
//!
//! Token tables map discrete ids to dense vectors; the positional module holds
//! learned absolute position tables. [`SequenceEmbedding`] sums the two the way
//! both encoder and decoder consume them.

pub mod errors;
pub mod positional;
pub mod sequence;
pub mod token;

pub use errors::{EmbeddingError, Result};
pub use positional::*;
pub use sequence::*;
pub use token::*;
