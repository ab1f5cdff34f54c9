//! Lightweight validation helpers shared across layer components.
//!
//! These routines provide concise shape assertions that can be wired
//! into constructors or forward paths. They return `candle_core::Result<()>`
//! so call sites can propagate errors without panicking.

use candle_core::{Error, Result, Tensor};

/// Validates the `(batch, seq, hidden)` convention with a known hidden size.
pub fn expect_batch_seq_hidden(context: &str, tensor: &Tensor, hidden: usize) -> Result<()> {
    match tensor.dims() {
        [_, _, actual_hidden] if *actual_hidden == hidden => Ok(()),
        dims => Err(Error::Msg(format!(
            "{context}: expected (batch, seq, {hidden}) layout, got {dims:?}"
        ))),
    }
}

/// Ensures two tensors share exactly the same shape.
pub fn expect_same_shape(context: &str, lhs: &Tensor, rhs: &Tensor) -> Result<()> {
    if lhs.dims() == rhs.dims() {
        Ok(())
    } else {
        Err(Error::Msg(format!(
            "{context}: shape mismatch {:?} vs {:?}",
            lhs.dims(),
            rhs.dims()
        )))
    }
}
