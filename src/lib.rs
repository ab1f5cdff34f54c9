//! Character-level encoder-decoder transformer.
//!
//! Re-exports the workspace crates and adds the glue the binary needs: device
//! selection, vocabulary-driven configuration and batch encoding.

pub use attention;
pub use embedding;
pub use layers;
pub use model;
pub use tokenizer;

pub use crate::model::{DeviceSpec, Transformer, TransformerConfig};
pub use crate::tokenizer::CharVocab;

use anyhow::{Context, Result};
use candle_core::{Device, Tensor};

/// Opens the requested device, falling back to CPU when the backend is unavailable.
///
/// Setting `CANDLE_FORCE_CPU` skips accelerator detection entirely.
pub fn setup_device(spec: DeviceSpec) -> Device {
    if std::env::var("CANDLE_FORCE_CPU").is_ok() {
        log::info!("CANDLE_FORCE_CPU set, using CPU backend");
        return Device::Cpu;
    }
    match spec.resolve() {
        Ok(device) => {
            log::info!("using {spec} backend");
            device
        }
        Err(err) => {
            log::warn!("{spec} unavailable ({err}), falling back to CPU");
            Device::Cpu
        }
    }
}

/// Sizes any side left at zero from `vocab`, reserving [`CharVocab::pad_index`]
/// as that side's pad token so no real character is ever masked.
pub fn config_for_vocab(mut config: TransformerConfig, vocab: &CharVocab) -> TransformerConfig {
    if config.src_vocab_size == 0 {
        config.src_vocab_size = vocab.size_with_pad();
        config.src_pad_idx = vocab.pad_index();
    }
    if config.trg_vocab_size == 0 {
        config.trg_vocab_size = vocab.size_with_pad();
        config.trg_pad_idx = vocab.pad_index();
    }
    config
}

/// Encodes `texts` into a `(batch, len)` `u32` tensor, truncating or padding each row.
pub fn encode_batch(
    vocab: &CharVocab,
    texts: &[&str],
    len: usize,
    pad: u32,
    device: &Device,
) -> Result<Tensor> {
    let mut ids = Vec::with_capacity(texts.len() * len);
    for text in texts {
        let row = vocab
            .encode_padded(text, len, pad)
            .with_context(|| format!("failed to encode {text:?}"))?;
        ids.extend(row);
    }
    Ok(Tensor::from_vec(ids, (texts.len(), len), device)?)
}
