use attention::AttentionError;
use embedding::EmbeddingError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("invalid model configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Attention(#[from] AttentionError),

    #[error(transparent)]
    Candle(#[from] candle_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("serde_json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<EmbeddingError> for ModelError {
    fn from(err: EmbeddingError) -> Self {
        match err {
            EmbeddingError::Backend(inner) => ModelError::Candle(inner),
            EmbeddingError::InvalidConfig(message) => ModelError::InvalidConfig(message),
            other => ModelError::InvalidInput(other.to_string()),
        }
    }
}
