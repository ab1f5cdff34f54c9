//! Error types emitted by attention layers.

use thiserror::Error;

/// Attention-specific error category.
#[derive(Debug, Error)]
pub enum AttentionError {
    /// The embedding width cannot be split evenly across heads.
    #[error("embed_size {embed_size} must be a non-zero multiple of heads {heads}")]
    IndivisibleHeads { embed_size: usize, heads: usize },
    /// The supplied tensor shapes do not align with the documented contract.
    #[error("invalid tensor shape for {context}")]
    InvalidShape { context: String },
    /// A backend-specific failure propagated to the caller.
    #[error(transparent)]
    Backend(#[from] candle_core::Error),
}
