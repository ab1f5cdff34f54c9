use thiserror::Error;

pub type Result<T> = std::result::Result<T, EmbeddingError>;

#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("invalid embedding configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid token ids: {0}")]
    InvalidTokenIds(String),

    #[error("token id {id} outside vocabulary of size {vocab_size}")]
    TokenOutOfRange { id: i64, vocab_size: usize },

    #[error("sequence length {len} exceeds maximum supported length {max_length}")]
    SequenceTooLong { len: usize, max_length: usize },

    #[error(transparent)]
    Backend(#[from] candle_core::Error),
}
