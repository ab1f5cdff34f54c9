//! Configuration and error types shared by the attention layers.

pub mod config;
pub mod errors;

pub use config::{Config, ScoreScale};
pub use errors::AttentionError;
