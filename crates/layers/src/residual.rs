//! Post-norm residual connections with dropout.
//!
//! Residual branches combine tensors of shape `(batch, seq, hidden)`. The
//! transformed branch is added to the residual path, normalised over the
//! hidden axis, then passed through dropout: `dropout(norm(branch + residual))`.

use candle_core::{Result, Tensor};
use candle_nn::{Dropout, LayerNorm, Module, VarBuilder};

use crate::{
    checks,
    norm::{layer_norm, NormConfig},
};

/// Configuration describing how a residual sublayer is wired.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualConfig {
    /// Width of the hidden states flowing through the residual path.
    pub hidden_size: usize,
    /// Dropout probability applied after normalisation during training.
    pub dropout_p: f32,
}

impl ResidualConfig {
    /// Creates a configuration with the given dropout probability.
    pub fn new(hidden_size: usize, dropout_p: f32) -> Self {
        Self {
            hidden_size,
            dropout_p,
        }
    }
}

/// Residual add, LayerNorm, dropout. Each instance owns its own norm parameters.
#[derive(Debug, Clone)]
pub struct AddNorm {
    config: ResidualConfig,
    norm: LayerNorm,
    dropout: Dropout,
}

impl AddNorm {
    pub fn new(config: ResidualConfig, vb: VarBuilder) -> Result<Self> {
        let norm = layer_norm(&NormConfig::new(config.hidden_size), vb)?;
        let dropout = Dropout::new(config.dropout_p);
        Ok(Self {
            config,
            norm,
            dropout,
        })
    }

    pub fn config(&self) -> &ResidualConfig {
        &self.config
    }

    /// Combines `branch` with `residual`; dropout is only active when `train` is set.
    pub fn forward(&self, branch: &Tensor, residual: &Tensor, train: bool) -> Result<Tensor> {
        checks::expect_batch_seq_hidden("residual.branch", branch, self.config.hidden_size)?;
        checks::expect_same_shape("residual", branch, residual)?;
        let summed = branch.add(residual)?;
        let normed = self.norm.forward(&summed)?;
        self.dropout.forward(&normed, train)
    }
}
