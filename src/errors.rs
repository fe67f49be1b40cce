use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::data::TaskCategory;
use crate::types::Url;

/// Error type for catalog configuration, IO, corpus parsing, and fetch failures.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("invalid pattern for category '{category}': {source}")]
    InvalidPattern {
        category: TaskCategory,
        #[source]
        source: Box<regex::Error>,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("malformed record in {}:{line}: {source}", path.display())]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("serialization failure: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("source '{url}' is unavailable: {reason}")]
    SourceUnavailable { url: Url, reason: String },
}
