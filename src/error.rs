//! Error types for corpus access

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or reading the corpus
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Duplicate document id `{id}`: {first:?} and {second:?}")]
    DuplicateId {
        id: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Missing required field `{field}` in {path:?}")]
    MissingField { field: &'static str, path: PathBuf },

    #[error("Invalid front-matter: {0}")]
    FrontMatter(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Invalid date_format: {0}")]
    DateFormat(String),

    #[error("Index error: {0}")]
    Index(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CorpusError>;
