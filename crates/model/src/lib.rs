//! Encoder-decoder transformer assembled from the shared crates.
//!
//! [`Transformer`] owns an [`Encoder`] and a [`Decoder`], derives the source
//! padding mask and the target causal mask, and maps `(src, trg)` token ids to
//! per-position target-vocabulary logits.

pub mod block;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod params;
pub mod transformer;

pub use block::TransformerBlock;
pub use config::{DeviceSpec, TransformerConfig};
pub use decoder::{Decoder, DecoderLayer};
pub use encoder::Encoder;
pub use error::{ModelError, Result};
pub use params::{named_parameters, parameter_count};
pub use transformer::Transformer;
