//! Token embedding layer.

use candle_core::{DType, Module, Tensor};
use candle_nn::{Embedding, VarBuilder};

use crate::errors::{EmbeddingError, Result};

/// Configuration for building a token embedding table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenEmbeddingConfig {
    /// Size of the vocabulary (number of distinct tokens).
    pub vocab_size: usize,
    /// Dimensionality of each embedding vector.
    pub hidden_dim: usize,
}

/// Learnable token embedding table, sampled from `N(0, 1)`.
#[derive(Debug, Clone)]
pub struct TokenEmbedding {
    config: TokenEmbeddingConfig,
    table: Embedding,
}

impl TokenEmbedding {
    /// Builds a new token embedding table registered as `vb/weight`.
    pub fn new(config: TokenEmbeddingConfig, vb: VarBuilder) -> Result<Self> {
        if config.vocab_size == 0 {
            return Err(EmbeddingError::InvalidConfig(
                "token embedding requires vocab_size > 0".into(),
            ));
        }
        if config.hidden_dim == 0 {
            return Err(EmbeddingError::InvalidConfig(
                "token embedding requires hidden_dim > 0".into(),
            ));
        }
        let table = candle_nn::embedding(config.vocab_size, config.hidden_dim, vb)?;
        Ok(Self { config, table })
    }

    /// Returns the embedding configuration.
    pub fn config(&self) -> &TokenEmbeddingConfig {
        &self.config
    }

    /// Returns the underlying `(vocab_size, hidden_dim)` weight tensor.
    pub fn weight(&self) -> &Tensor {
        self.table.embeddings()
    }

    /// Looks up embeddings for the provided token ids.
    ///
    /// Inputs must be shaped `(batch, seq)` with an integer dtype. Outputs follow the
    /// `(batch, seq, hidden)` layout.
    pub fn forward(&self, token_ids: &Tensor) -> Result<Tensor> {
        validate_token_ids(token_ids)?;
        ensure_id_range(token_ids, self.config.vocab_size)?;
        Ok(self.table.forward(token_ids)?)
    }
}

/// Checks the `(batch, seq)` layout and `u32`/`i64` dtype of a token id tensor.
pub fn validate_token_ids(token_ids: &Tensor) -> Result<()> {
    match token_ids.dims() {
        [batch, seq] => {
            if *batch == 0 || *seq == 0 {
                return Err(EmbeddingError::InvalidTokenIds(
                    "token_ids must have non-zero batch and seq dimensions".into(),
                ));
            }
        }
        dims => {
            return Err(EmbeddingError::InvalidTokenIds(format!(
                "token_ids must be shaped [batch, seq], got {dims:?}"
            )))
        }
    }

    match token_ids.dtype() {
        DType::U32 | DType::I64 => Ok(()),
        dtype => Err(EmbeddingError::InvalidTokenIds(format!(
            "token_ids expected u32 or i64 but received {dtype:?}"
        ))),
    }
}

/// Ensures every id lies in `[0, vocab_size)`.
pub fn ensure_id_range(token_ids: &Tensor, vocab_size: usize) -> Result<()> {
    if token_ids.elem_count() == 0 {
        return Ok(());
    }
    let flat = token_ids.to_dtype(DType::I64)?.flatten_all()?;

    let min_id = flat.min(0)?.to_scalar::<i64>()?;
    if min_id < 0 {
        return Err(EmbeddingError::TokenOutOfRange {
            id: min_id,
            vocab_size,
        });
    }

    let max_id = flat.max(0)?.to_scalar::<i64>()?;
    if max_id >= vocab_size as i64 {
        return Err(EmbeddingError::TokenOutOfRange {
            id: max_id,
            vocab_size,
        });
    }
    Ok(())
}
