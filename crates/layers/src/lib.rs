//! Building blocks for transformer layers.
//!
//! Every component here consumes hidden states shaped `(batch, seq, hidden)`
//! and returns the same layout, so blocks can be chained with residual
//! connections. Parameters are registered through a [`candle_nn::VarBuilder`]
//! which keeps them enumerable by name for an external optimizer.

pub mod checks;
pub mod mlp;
pub mod norm;
pub mod residual;

pub use mlp::{FeedForward, FeedForwardConfig};
pub use norm::{layer_norm, NormConfig};
pub use residual::{AddNorm, ResidualConfig};
