//! Masked multi-head scaled dot-product attention.
//!
//! The crate provides the attention sublayer shared by the encoder and the
//! decoder. Inputs are hidden states laid out as `[batch, seq_len, embed_size]`;
//! value and key must share a length, which may differ from the query length
//! (cross-attention). Heads split the embedding axis into `heads` groups of
//! `embed_size / heads` features.
//!
//! Masks are `u8` tensors of zeros and ones broadcastable to
//! `[batch, heads, q_len, k_len]`. Positions holding `0` have their raw score
//! replaced by [`masks::MASK_FILL_VALUE`] before softmax, so they receive a
//! negligible weight. Builders for padding and causal masks live in [`masks`].
//!
//! Dropout is not applied inside attention; the surrounding blocks own it.

pub mod core;
pub mod masks;
pub mod multi_head;

pub use core::{AttentionError, Config, ScoreScale};
pub use multi_head::MultiHeadAttention;
