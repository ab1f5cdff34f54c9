//! Source-side encoder stack.

use candle_core::Tensor;
use candle_nn::VarBuilder;
use embedding::{SequenceEmbedding, SequenceEmbeddingConfig};

use crate::{block::TransformerBlock, config::TransformerConfig, error::Result};

/// Source-side stack: embeddings followed by `num_layers` self-attention blocks.
#[derive(Debug, Clone)]
pub struct Encoder {
    embedding: SequenceEmbedding,
    layers: Vec<TransformerBlock>,
}

impl Encoder {
    pub fn new(config: &TransformerConfig, vb: VarBuilder) -> Result<Self> {
        let embedding = SequenceEmbedding::new(
            &SequenceEmbeddingConfig {
                vocab_size: config.src_vocab_size,
                max_length: config.max_length,
                hidden_dim: config.embed_size,
                dropout_p: config.dropout,
            },
            vb.clone(),
        )?;

        let layers_vb = vb.pp("layers");
        let layers = (0..config.num_layers)
            .map(|index| TransformerBlock::new(config, layers_vb.pp(index)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { embedding, layers })
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// Maps `(batch, src_len)` ids to `(batch, src_len, embed_size)`.
    pub fn forward(&self, src: &Tensor, src_mask: &Tensor, train: bool) -> Result<Tensor> {
        let mut hidden = self.embedding.forward(src, train)?;
        for layer in &self.layers {
            hidden = layer.forward(&hidden, &hidden, &hidden, Some(src_mask), train)?;
        }
        Ok(hidden)
    }
}
