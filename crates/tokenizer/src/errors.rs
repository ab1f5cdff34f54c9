use thiserror::Error;

pub type Result<T> = std::result::Result<T, VocabError>;

#[derive(Error, Debug)]
pub enum VocabError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serde_json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("character {0:?} is not in the vocabulary")]
    UnknownChar(char),

    #[error("index {index} outside vocabulary of size {vocab_size}")]
    UnknownIndex { index: u32, vocab_size: usize },

    #[error("cannot build a vocabulary from an empty corpus")]
    EmptyCorpus,

    #[error("malformed vocabulary: {0}")]
    Malformed(String),
}
