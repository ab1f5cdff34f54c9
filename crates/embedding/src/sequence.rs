//! Summed token + position embedding with dropout.

use candle_core::Tensor;
use candle_nn::{Dropout, VarBuilder};

use crate::{
    errors::Result,
    positional::{PositionalEmbedding, PositionalEmbeddingConfig},
    token::{TokenEmbedding, TokenEmbeddingConfig},
};

/// Configuration for one side (source or target) of the model input.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceEmbeddingConfig {
    pub vocab_size: usize,
    pub max_length: usize,
    pub hidden_dim: usize,
    pub dropout_p: f32,
}

/// `dropout(token_embedding(ids) + position_embedding(0..seq_len))`.
///
/// Parameters are registered as `word_embedding.weight` and
/// `position_embedding.weight` under the supplied builder.
#[derive(Debug, Clone)]
pub struct SequenceEmbedding {
    token: TokenEmbedding,
    position: PositionalEmbedding,
    dropout: Dropout,
}

impl SequenceEmbedding {
    pub fn new(config: &SequenceEmbeddingConfig, vb: VarBuilder) -> Result<Self> {
        let token = TokenEmbedding::new(
            TokenEmbeddingConfig {
                vocab_size: config.vocab_size,
                hidden_dim: config.hidden_dim,
            },
            vb.pp("word_embedding"),
        )?;
        let position = PositionalEmbedding::new(
            PositionalEmbeddingConfig {
                max_length: config.max_length,
                hidden_dim: config.hidden_dim,
            },
            vb.pp("position_embedding"),
        )?;
        log::debug!(
            "sequence embedding vocab={} max_length={} hidden={}",
            config.vocab_size,
            config.max_length,
            config.hidden_dim
        );
        Ok(Self {
            token,
            position,
            dropout: Dropout::new(config.dropout_p),
        })
    }

    pub fn token(&self) -> &TokenEmbedding {
        &self.token
    }

    pub fn position(&self) -> &PositionalEmbedding {
        &self.position
    }

    /// Embeds `(batch, seq)` ids into `(batch, seq, hidden)`.
    pub fn forward(&self, token_ids: &Tensor, train: bool) -> Result<Tensor> {
        let tokens = self.token.forward(token_ids)?;
        let (_, seq_len, _) = tokens.dims3()?;
        let positions = self.position.forward(seq_len, token_ids.device())?;
        let summed = tokens.broadcast_add(&positions)?;
        Ok(self.dropout.forward(&summed, train)?)
    }
}
