//! Configuration options shared by attention layers.

use serde::{Deserialize, Serialize};

use super::AttentionError;

/// Divisor applied to raw attention scores before softmax.
///
/// The model scales by `sqrt(embed_size)`; [`ScoreScale::HeadDim`] selects the
/// more common `sqrt(head_dim)` and changes numerics, so checkpoints trained
/// with one setting are not interchangeable with the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreScale {
    #[default]
    EmbedSize,
    HeadDim,
}

/// Configuration driving attention behaviour.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Width of the hidden states entering and leaving the layer.
    pub embed_size: usize,
    /// Number of parallel heads.
    pub heads: usize,
    /// Score scaling convention.
    pub score_scale: ScoreScale,
}

impl Config {
    pub fn new(embed_size: usize, heads: usize) -> Self {
        Self {
            embed_size,
            heads,
            score_scale: ScoreScale::default(),
        }
    }

    /// Fails when `embed_size` is not an exact multiple of `heads`.
    pub fn validate(&self) -> Result<(), AttentionError> {
        if self.heads == 0 || self.embed_size == 0 || self.embed_size % self.heads != 0 {
            return Err(AttentionError::IndivisibleHeads {
                embed_size: self.embed_size,
                heads: self.heads,
            });
        }
        Ok(())
    }

    pub fn head_dim(&self) -> usize {
        self.embed_size / self.heads
    }

    /// Multiplier applied to raw scores, `1 / sqrt(divisor)`.
    pub fn scale_factor(&self) -> f64 {
        let divisor = match self.score_scale {
            ScoreScale::EmbedSize => self.embed_size,
            ScoreScale::HeadDim => self.head_dim(),
        };
        1.0 / (divisor as f64).sqrt()
    }
}
