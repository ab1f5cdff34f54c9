//! Mask utilities shared by attention layers.
//!
//! All masks produced here are `u8` tensors holding `1` (keep) or `0`
//! (discard), shaped so they broadcast to `[batch, num_heads, q_len, k_len]`.
//! [`apply_mask`] turns a mask into pre-softmax score replacement.

pub mod causal;
pub mod padding;

use candle_core::{DType, Tensor};

use crate::core::AttentionError;

/// Dtype shared by all masks.
pub const MASK_DTYPE: DType = DType::U8;

/// Score written into masked positions before softmax.
pub const MASK_FILL_VALUE: f32 = -1e20;

pub use causal::build_causal_mask;
pub use padding::padding_mask;

/// Replaces `scores` entries with `fill` wherever `mask` is zero.
///
/// `scores` is `[batch, heads, q_len, k_len]`; each mask axis must either
/// match or be `1`. Float masks are accepted and read as zero / non-zero.
pub fn apply_mask(scores: &Tensor, mask: &Tensor, fill: f32) -> Result<Tensor, AttentionError> {
    let (batch, heads, q_len, k_len) = scores.dims4()?;
    let (mb, mh, mq, mk) = mask.dims4().map_err(|_| AttentionError::InvalidShape {
        context: format!(
            "mask must have rank 4 broadcastable to [{batch}, {heads}, {q_len}, {k_len}], got {:?}",
            mask.dims()
        ),
    })?;
    let compatible = |actual: usize, expected: usize| actual == 1 || actual == expected;
    if !compatible(mb, batch)
        || !compatible(mh, heads)
        || !compatible(mq, q_len)
        || !compatible(mk, k_len)
    {
        return Err(AttentionError::InvalidShape {
            context: format!(
                "mask shape mismatch: expected broadcastable to [{batch}, {heads}, {q_len}, {k_len}] got [{mb}, {mh}, {mq}, {mk}]"
            ),
        });
    }

    let mask = if mask.dtype().is_float() {
        mask.ne(0f32)?
    } else {
        mask.clone()
    };
    let mask = mask.broadcast_as(scores.shape())?;
    let fill = Tensor::new(fill, scores.device())?
        .to_dtype(scores.dtype())?
        .broadcast_as(scores.shape())?;
    Ok(mask.where_cond(scores, &fill)?)
}
