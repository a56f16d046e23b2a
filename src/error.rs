// src/error.rs
use std::io;
use thiserror::Error;

/// Failures of the file, blob and configuration layers around the engine.
/// Queries and inserts never produce one of these.
#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode or decode dictionary: {0}")]
    Encode(#[from] bincode::Error),

    #[error("invalid dictionary json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("dictionary is corrupt: {0}")]
    CorruptDictionary(String),

    #[error("dictionary id {0:?} may only contain letters, digits, '-' and '_'")]
    InvalidDictionaryId(String),
}

pub type Result<T> = std::result::Result<T, Error>;
