//! Learned absolute position table.
//!
//! Position `p` of every sequence in the batch maps to row `p` of a
//! `(max_length, hidden_dim)` table, so the table bounds the supported
//! sequence length.

use candle_core::{Device, Module, Tensor};
use candle_nn::{Embedding, VarBuilder};

use crate::errors::{EmbeddingError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionalEmbeddingConfig {
    /// Longest sequence the table can index.
    pub max_length: usize,
    /// Dimensionality of each position vector.
    pub hidden_dim: usize,
}

#[derive(Debug, Clone)]
pub struct PositionalEmbedding {
    config: PositionalEmbeddingConfig,
    table: Embedding,
}

impl PositionalEmbedding {
    pub fn new(config: PositionalEmbeddingConfig, vb: VarBuilder) -> Result<Self> {
        if config.max_length == 0 || config.hidden_dim == 0 {
            return Err(EmbeddingError::InvalidConfig(format!(
                "positional embedding requires non-zero max_length and hidden_dim, got {} x {}",
                config.max_length, config.hidden_dim
            )));
        }
        let table = candle_nn::embedding(config.max_length, config.hidden_dim, vb)?;
        Ok(Self { config, table })
    }

    pub fn config(&self) -> &PositionalEmbeddingConfig {
        &self.config
    }

    pub fn max_length(&self) -> usize {
        self.config.max_length
    }

    /// Returns the `(1, seq_len, hidden_dim)` embeddings for positions `0..seq_len`.
    ///
    /// The leading axis broadcasts over the batch; every batch element sees the
    /// same position vectors.
    pub fn forward(&self, seq_len: usize, device: &Device) -> Result<Tensor> {
        if seq_len == 0 {
            return Err(EmbeddingError::InvalidTokenIds(
                "sequence length must be non-zero".into(),
            ));
        }
        if seq_len > self.config.max_length {
            return Err(EmbeddingError::SequenceTooLong {
                len: seq_len,
                max_length: self.config.max_length,
            });
        }
        let positions = Tensor::arange(0u32, seq_len as u32, device)?;
        let embedded = self.table.forward(&positions)?;
        Ok(embedded.unsqueeze(0)?)
    }
}
