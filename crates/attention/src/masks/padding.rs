//! Builders for padding masks used to drop padded keys.

use candle_core::{DType, Result, Tensor};

/// Marks every non-padding token of a `[batch, len]` id tensor.
///
/// Returns a [`MASK_DTYPE`](super::MASK_DTYPE) tensor shaped
/// `[batch, 1, 1, len]` holding `1` where the token differs from `pad_idx`.
/// Ids are widened to `i64` before comparing, so narrow id dtypes never
/// truncate the pad index.
pub fn padding_mask(tokens: &Tensor, pad_idx: u32) -> Result<Tensor> {
    let (batch, len) = tokens.dims2()?;
    let tokens = tokens.to_dtype(DType::I64)?;
    let pad = Tensor::new(pad_idx as i64, tokens.device())?.broadcast_as(tokens.shape())?;
    tokens.ne(&pad)?.reshape((batch, 1, 1, len))
}
