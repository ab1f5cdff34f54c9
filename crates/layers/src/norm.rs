//! Layer normalisation over the hidden axis.
//!
//! Inputs follow the `(batch, seq, hidden)` convention. Normalisation happens
//! along the last axis with a learnable scale and shift per feature.

use candle_core::Result;
use candle_nn::{LayerNorm, VarBuilder};

/// Configuration shared by all normalisation layers.
#[derive(Debug, Clone, PartialEq)]
pub struct NormConfig {
    /// Size of the hidden dimension being normalised.
    pub hidden_size: usize,
    /// Numeric stabiliser added to the variance.
    pub epsilon: f64,
}

impl NormConfig {
    /// Creates a configuration using the usual transformer epsilon.
    pub fn new(hidden_size: usize) -> Self {
        Self {
            hidden_size,
            epsilon: 1e-5,
        }
    }
}

/// Builds a LayerNorm whose `weight`/`bias` are registered under `vb`.
pub fn layer_norm(config: &NormConfig, vb: VarBuilder) -> Result<LayerNorm> {
    candle_nn::layer_norm(config.hidden_size, config.epsilon, vb)
}
