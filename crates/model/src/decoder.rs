//! Target-side decoder layers and the vocabulary projection.
//!
//! Each [`DecoderLayer`] runs causal self-attention over the target and then
//! attends into the encoder output with the source padding mask.

use attention::MultiHeadAttention;
use candle_core::{Module, Tensor};
use candle_nn::{Linear, VarBuilder};
use embedding::{SequenceEmbedding, SequenceEmbeddingConfig};
use layers::{AddNorm, ResidualConfig};

use crate::{block::TransformerBlock, config::TransformerConfig, error::Result};

/// Causal self-attention over the target, then cross-attention into the
/// encoder output through a [`TransformerBlock`].
#[derive(Debug, Clone)]
pub struct DecoderLayer {
    self_attention: MultiHeadAttention,
    residual: AddNorm,
    block: TransformerBlock,
}

impl DecoderLayer {
    pub fn new(config: &TransformerConfig, vb: VarBuilder) -> Result<Self> {
        let self_attention =
            MultiHeadAttention::new(config.attention_config(), vb.pp("self_attention"))?;
        let residual = AddNorm::new(
            ResidualConfig::new(config.embed_size, config.dropout),
            vb.pp("norm"),
        )?;
        let block = TransformerBlock::new(config, vb.pp("block"))?;
        Ok(Self {
            self_attention,
            residual,
            block,
        })
    }

    /// `x` is `(batch, trg_len, embed)`, `encoder_out` is `(batch, src_len, embed)`.
    pub fn forward(
        &self,
        x: &Tensor,
        encoder_out: &Tensor,
        src_mask: &Tensor,
        trg_mask: &Tensor,
        train: bool,
    ) -> Result<Tensor> {
        let attended = self.self_attention.forward(x, x, x, Some(trg_mask))?;
        let query = self.residual.forward(&attended, x, train)?;
        self.block
            .forward(encoder_out, encoder_out, &query, Some(src_mask), train)
    }
}

/// Target-side stack ending in a projection onto the target vocabulary.
#[derive(Debug, Clone)]
pub struct Decoder {
    embedding: SequenceEmbedding,
    layers: Vec<DecoderLayer>,
    fc_out: Linear,
}

impl Decoder {
    pub fn new(config: &TransformerConfig, vb: VarBuilder) -> Result<Self> {
        let embedding = SequenceEmbedding::new(
            &SequenceEmbeddingConfig {
                vocab_size: config.trg_vocab_size,
                max_length: config.max_length,
                hidden_dim: config.embed_size,
                dropout_p: config.dropout,
            },
            vb.clone(),
        )?;

        let layers_vb = vb.pp("layers");
        let layers = (0..config.num_layers)
            .map(|index| DecoderLayer::new(config, layers_vb.pp(index)))
            .collect::<Result<Vec<_>>>()?;

        let fc_out = candle_nn::linear(config.embed_size, config.trg_vocab_size, vb.pp("fc_out"))?;

        Ok(Self {
            embedding,
            layers,
            fc_out,
        })
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// Produces logits shaped `(batch, trg_len, trg_vocab_size)`.
    pub fn forward(
        &self,
        trg: &Tensor,
        encoder_out: &Tensor,
        src_mask: &Tensor,
        trg_mask: &Tensor,
        train: bool,
    ) -> Result<Tensor> {
        let mut hidden = self.embedding.forward(trg, train)?;
        for layer in &self.layers {
            hidden = layer.forward(&hidden, encoder_out, src_mask, trg_mask, train)?;
        }
        Ok(self.fc_out.forward(&hidden)?)
    }
}
