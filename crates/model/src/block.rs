//! Attention plus feed-forward block shared by both stacks.

use attention::MultiHeadAttention;
use candle_core::{Module, Tensor};
use candle_nn::VarBuilder;
use layers::{AddNorm, FeedForward, FeedForwardConfig, ResidualConfig};

use crate::{config::TransformerConfig, error::Result};

/// Attention followed by a position-wise feed-forward, each wrapped in a
/// post-norm residual:
///
/// ```text
/// x   = dropout(norm1(attention(value, key, query, mask) + query))
/// out = dropout(norm2(feed_forward(x) + x))
/// ```
#[derive(Debug, Clone)]
pub struct TransformerBlock {
    attention: MultiHeadAttention,
    attention_residual: AddNorm,
    feed_forward: FeedForward,
    feed_forward_residual: AddNorm,
}

impl TransformerBlock {
    pub fn new(config: &TransformerConfig, vb: VarBuilder) -> Result<Self> {
        let attention = MultiHeadAttention::new(config.attention_config(), vb.pp("attention"))?;
        let residual = ResidualConfig::new(config.embed_size, config.dropout);
        let attention_residual = AddNorm::new(residual.clone(), vb.pp("norm1"))?;
        let feed_forward = FeedForward::new(
            FeedForwardConfig::new(config.embed_size, config.forward_expansion),
            vb.pp("feed_forward"),
        )?;
        let feed_forward_residual = AddNorm::new(residual, vb.pp("norm2"))?;
        Ok(Self {
            attention,
            attention_residual,
            feed_forward,
            feed_forward_residual,
        })
    }

    /// Returns a tensor shaped like `query`.
    pub fn forward(
        &self,
        value: &Tensor,
        key: &Tensor,
        query: &Tensor,
        mask: Option<&Tensor>,
        train: bool,
    ) -> Result<Tensor> {
        let attended = self.attention.forward(value, key, query, mask)?;
        let x = self.attention_residual.forward(&attended, query, train)?;
        let projected = self.feed_forward.forward(&x)?;
        Ok(self.feed_forward_residual.forward(&projected, &x, train)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attention::masks::build_causal_mask;
    use candle_core::{DType, Device};
    use candle_nn::VarMap;

    fn build(embed_size: usize, heads: usize) -> TransformerBlock {
        let config = TransformerConfig {
            embed_size,
            heads,
            ..TransformerConfig::new(4, 4, 0, 0)
        };
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        TransformerBlock::new(&config, vb).unwrap()
    }

    #[test]
    fn output_matches_query_shape() -> Result<()> {
        let device = Device::Cpu;
        for &(batch, len, embed_size, heads) in &[(1, 1, 4, 1), (2, 5, 8, 2), (3, 7, 12, 4)] {
            let block = build(embed_size, heads);
            let x = Tensor::randn(0f32, 1.0, (batch, len, embed_size), &device)?;
            let mask = build_causal_mask(&device, batch, len)?;
            let out = block.forward(&x, &x, &x, Some(&mask), false)?;
            assert_eq!(out.dims(), x.dims());
        }
        Ok(())
    }

    #[test]
    fn debug_lists_components() {
        let rendered = format!("{:?}", build(8, 2));
        assert!(rendered.starts_with("TransformerBlock"));
        assert!(rendered.contains("feed_forward_residual"));
    }

    #[test]
    fn cross_attention_follows_query_length() -> Result<()> {
        let device = Device::Cpu;
        let block = build(8, 2);
        let memory = Tensor::randn(0f32, 1.0, (2, 6, 8), &device)?;
        let query = Tensor::randn(0f32, 1.0, (2, 3, 8), &device)?;
        let out = block.forward(&memory, &memory, &query, None, false)?;
        assert_eq!(out.dims(), &[2, 3, 8]);
        Ok(())
    }
}
