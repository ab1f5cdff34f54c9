//! Multi-head attention with learned value/key/query/output projections.
//!
//! `forward(values, keys, query, mask)` projects each input, splits the
//! embedding axis into heads, computes masked scaled dot-product attention per
//! head and projects the concatenated heads back to `embed_size`.

use candle_core::Tensor;
use candle_nn::{ops::softmax_last_dim, Linear, Module, VarBuilder};

use crate::core::{AttentionError, Config};
use crate::masks::{apply_mask, MASK_FILL_VALUE};

/// Scaled dot-product attention over tensors laid out `[batch, heads, len, head_dim]`.
///
/// Raw scores `q · kᵀ` are masked first, then multiplied by `scale` and
/// normalised over the key axis. Returns the attended values
/// `[batch, heads, q_len, head_dim]` together with the weights
/// `[batch, heads, q_len, k_len]`.
pub fn scaled_dot_product(
    q: &Tensor,
    k: &Tensor,
    v: &Tensor,
    mask: Option<&Tensor>,
    scale: f64,
) -> Result<(Tensor, Tensor), AttentionError> {
    let (batch, heads, _, head_dim) = q.dims4()?;
    let (kb, kh, k_len, kd) = k.dims4()?;
    let (vb, vh, vk, vd) = v.dims4()?;
    if kb != batch || kh != heads || kd != head_dim {
        return Err(AttentionError::InvalidShape {
            context: format!(
                "k shape mismatch: expected [{batch}, {heads}, ?, {head_dim}] got [{kb}, {kh}, {k_len}, {kd}]"
            ),
        });
    }
    if vb != batch || vh != heads || vk != k_len || vd != head_dim {
        return Err(AttentionError::InvalidShape {
            context: format!(
                "v shape mismatch: expected [{batch}, {heads}, {k_len}, {head_dim}] got [{vb}, {vh}, {vk}, {vd}]"
            ),
        });
    }

    let k_t = k.t()?.contiguous()?;
    let mut scores = q.contiguous()?.matmul(&k_t)?;
    if let Some(mask) = mask {
        scores = apply_mask(&scores, mask, MASK_FILL_VALUE)?;
    }
    let scores = scores.affine(scale, 0.0)?;
    let weights = softmax_last_dim(&scores)?;
    let output = weights.matmul(&v.contiguous()?)?;
    Ok((output, weights))
}

/// Multi-head attention sublayer. Parameters live under `values`, `keys`,
/// `queries` and `fc_out` of the supplied builder.
#[derive(Debug, Clone)]
pub struct MultiHeadAttention {
    config: Config,
    values: Linear,
    keys: Linear,
    queries: Linear,
    fc_out: Linear,
}

impl MultiHeadAttention {
    /// Fails with [`AttentionError::IndivisibleHeads`] unless `embed_size % heads == 0`.
    pub fn new(config: Config, vb: VarBuilder) -> Result<Self, AttentionError> {
        config.validate()?;
        let embed = config.embed_size;
        let values = candle_nn::linear(embed, embed, vb.pp("values"))?;
        let keys = candle_nn::linear(embed, embed, vb.pp("keys"))?;
        let queries = candle_nn::linear(embed, embed, vb.pp("queries"))?;
        let fc_out = candle_nn::linear(embed, embed, vb.pp("fc_out"))?;
        log::debug!(
            "attention heads={} head_dim={} scale={:?}",
            config.heads,
            config.head_dim(),
            config.score_scale
        );
        Ok(Self {
            config,
            values,
            keys,
            queries,
            fc_out,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns `[batch, q_len, embed_size]`.
    pub fn forward(
        &self,
        values: &Tensor,
        keys: &Tensor,
        query: &Tensor,
        mask: Option<&Tensor>,
    ) -> Result<Tensor, AttentionError> {
        self.forward_with_weights(values, keys, query, mask)
            .map(|(output, _)| output)
    }

    /// Like [`forward`](Self::forward) but also returns the post-softmax
    /// weights `[batch, heads, q_len, k_len]`.
    pub fn forward_with_weights(
        &self,
        values: &Tensor,
        keys: &Tensor,
        query: &Tensor,
        mask: Option<&Tensor>,
    ) -> Result<(Tensor, Tensor), AttentionError> {
        let (batch, k_len, q_len) = self.validate_inputs(values, keys, query)?;

        let v = self.split_heads(&self.values.forward(values)?, batch, k_len)?;
        let k = self.split_heads(&self.keys.forward(keys)?, batch, k_len)?;
        let q = self.split_heads(&self.queries.forward(query)?, batch, q_len)?;

        let scale = self.config.scale_factor();
        let (attended, weights) = scaled_dot_product(&q, &k, &v, mask, scale)?;
        let merged = attended
            .transpose(1, 2)?
            .reshape((batch, q_len, self.config.embed_size))?;
        let output = self.fc_out.forward(&merged)?;
        Ok((output, weights))
    }

    fn split_heads(
        &self,
        tensor: &Tensor,
        batch: usize,
        len: usize,
    ) -> Result<Tensor, AttentionError> {
        Ok(tensor
            .reshape((batch, len, self.config.heads, self.config.head_dim()))?
            .transpose(1, 2)?
            .contiguous()?)
    }

    fn validate_inputs(
        &self,
        values: &Tensor,
        keys: &Tensor,
        query: &Tensor,
    ) -> Result<(usize, usize, usize), AttentionError> {
        let embed = self.config.embed_size;
        let dims = |name: &str, tensor: &Tensor| -> Result<(usize, usize), AttentionError> {
            match tensor.dims() {
                [batch, len, width] if *width == embed && *len > 0 => Ok((*batch, *len)),
                dims => Err(AttentionError::InvalidShape {
                    context: format!("{name} must have shape [batch, len, {embed}], got {dims:?}"),
                }),
            }
        };
        let (vb, v_len) = dims("values", values)?;
        let (kb, k_len) = dims("keys", keys)?;
        let (qb, q_len) = dims("query", query)?;

        if vb != kb || kb != qb {
            return Err(AttentionError::InvalidShape {
                context: format!("batch mismatch: values {vb}, keys {kb}, query {qb}"),
            });
        }
        if v_len != k_len {
            return Err(AttentionError::InvalidShape {
                context: format!("values length {v_len} must equal keys length {k_len}"),
            });
        }
        Ok((qb, k_len, q_len))
    }
}
