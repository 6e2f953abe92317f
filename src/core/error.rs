// Error handling for AR4 reader

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Ar4Error>;

#[derive(Error, Debug)]
pub enum Ar4Error {
    #[error("Failed to access {path}: {source}")]
    FileAccess {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Archive {path} has no data chunks")]
    EmptyArchive { path: PathBuf },

    #[error("Malformed header: expected at least {expected} bytes, got {got}")]
    MalformedHeader { expected: usize, got: usize },

    #[error("Corrupt record in chunk {chunk} at offset {offset} (length {length}): {reason}")]
    CorruptRecord {
        chunk: usize,
        offset: usize,
        length: usize,
        reason: String,
    },

    #[error("Archive length {len} is not a multiple of chunk size {chunk_size}")]
    TruncatedArchive { len: usize, chunk_size: usize },

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),
}
