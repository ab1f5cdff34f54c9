//! Builders for causal attention masks.
//!
//! The resulting tensors have dtype [`MASK_DTYPE`](super::MASK_DTYPE) and shape
//! `[batch, 1, len, len]`. Entry `(i, j)` is `1` iff `j <= i`, so position `i`
//! never attends to a later position.

use candle_core::{Device, Result, Tensor};

/// Construct a lower-triangular causal mask replicated over the batch.
pub fn build_causal_mask(device: &Device, batch: usize, len: usize) -> Result<Tensor> {
    let mut data = vec![0u8; len * len];
    for q in 0..len {
        let row_start = q * len;
        for k in 0..=q {
            data[row_start + k] = 1;
        }
    }

    Tensor::from_vec(data, (1, 1, len, len), device)?.broadcast_as((batch, 1, len, len))
}
