//! Absolute positional embeddings.

pub mod learned;

pub use learned::{PositionalEmbedding, PositionalEmbeddingConfig};
