//! The composed encoder-decoder model.
//!
//! [`Transformer`] validates token ids, derives the source padding mask and the
//! target causal mask, and runs the encoder then the decoder.

use attention::masks::{build_causal_mask, padding_mask};
use candle_core::{DType, Device, Tensor};
use candle_nn::{VarBuilder, VarMap};
use embedding::{ensure_id_range, validate_token_ids};

use crate::{
    config::TransformerConfig,
    decoder::Decoder,
    encoder::Encoder,
    error::{ModelError, Result},
};

/// Sequence-to-sequence transformer over token ids.
#[derive(Debug, Clone)]
pub struct Transformer {
    config: TransformerConfig,
    device: Device,
    encoder: Encoder,
    decoder: Decoder,
}

impl Transformer {
    /// Builds the model with parameters registered under `encoder.*` and `decoder.*`.
    pub fn new(config: TransformerConfig, vb: VarBuilder) -> Result<Self> {
        config.validate()?;
        let device = vb.device().clone();
        let encoder = Encoder::new(&config, vb.pp("encoder"))?;
        let decoder = Decoder::new(&config, vb.pp("decoder"))?;

        log::info!(
            "transformer ready: embed_size={} heads={} layers={} src_vocab={} trg_vocab={} device={}",
            config.embed_size,
            config.heads,
            config.num_layers,
            config.src_vocab_size,
            config.trg_vocab_size,
            config.device
        );

        Ok(Self {
            config,
            device,
            encoder,
            decoder,
        })
    }

    /// Fresh `f32` parameters on the configured device.
    pub fn init(config: TransformerConfig) -> Result<(Self, VarMap)> {
        let device = config.device.resolve()?;
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let model = Self::new(config, vb)?;
        Ok((model, varmap))
    }

    pub fn config(&self) -> &TransformerConfig {
        &self.config
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// `(batch, 1, 1, src_len)` mask with 1 wherever `src` is not padding.
    pub fn make_src_mask(&self, src: &Tensor) -> Result<Tensor> {
        Ok(padding_mask(src, self.config.src_pad_idx)?)
    }

    /// `(batch, 1, trg_len, trg_len)` lower-triangular mask.
    pub fn make_trg_mask(&self, trg: &Tensor) -> Result<Tensor> {
        let (batch, len) = trg.dims2()?;
        Ok(build_causal_mask(trg.device(), batch, len)?)
    }

    pub fn encode(&self, src: &Tensor, src_mask: &Tensor, train: bool) -> Result<Tensor> {
        self.encoder.forward(src, src_mask, train)
    }

    pub fn decode(
        &self,
        trg: &Tensor,
        encoder_out: &Tensor,
        src_mask: &Tensor,
        trg_mask: &Tensor,
        train: bool,
    ) -> Result<Tensor> {
        self.decoder.forward(trg, encoder_out, src_mask, trg_mask, train)
    }

    /// Eval-mode logits shaped `(batch, trg_len, trg_vocab_size)`.
    pub fn forward(&self, src: &Tensor, trg: &Tensor) -> Result<Tensor> {
        self.forward_t(src, trg, false)
    }

    /// Same as [`forward`](Self::forward); dropout is active when `train` is set.
    pub fn forward_t(&self, src: &Tensor, trg: &Tensor, train: bool) -> Result<Tensor> {
        self.validate_inputs(src, trg)?;
        let src_mask = self.make_src_mask(src)?;
        let trg_mask = self.make_trg_mask(trg)?;
        let encoder_out = self.encode(src, &src_mask, train)?;
        self.decode(trg, &encoder_out, &src_mask, &trg_mask, train)
    }

    fn validate_inputs(&self, src: &Tensor, trg: &Tensor) -> Result<()> {
        validate_token_ids(src)?;
        validate_token_ids(trg)?;

        let (src_batch, src_len) = src.dims2()?;
        let (trg_batch, trg_len) = trg.dims2()?;
        if src_batch != trg_batch {
            return Err(ModelError::InvalidInput(format!(
                "src batch {src_batch} does not match trg batch {trg_batch}"
            )));
        }
        let max_length = self.config.max_length;
        for (side, len) in [("src", src_len), ("trg", trg_len)] {
            if len > max_length {
                return Err(ModelError::InvalidInput(format!(
                    "{side} length {len} exceeds max_length {max_length}"
                )));
            }
        }

        ensure_id_range(src, self.config.src_vocab_size)?;
        ensure_id_range(trg, self.config.trg_vocab_size)?;
        Ok(())
    }
}
