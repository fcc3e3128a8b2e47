use crate::types::{Element, Generator};
use thiserror::Error;

/// Errors raised by the backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cache file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed cache record on line {line}: {source}")]
    Decode {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("cache record on line {line} is filed under S_{n} but holds an element of S_{rank}")]
    RankMismatch { line: usize, n: usize, rank: usize },

    #[error("failed to encode cache record: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum CoxeterError {
    /// Ambient size below 1.
    #[error("n must be a positive integer, got {n}")]
    Domain { n: usize },

    /// Ambient size above the configured maximum.
    #[error("n = {n} exceeds the supported maximum of {max}")]
    UnsupportedRank { n: usize, max: usize },

    #[error("generator {generator} not between 0 and {n}")]
    GeneratorOutOfRange { generator: Generator, n: usize },

    #[error("word of length {len} is too long to enumerate subwords (limit is 63)")]
    WordTooLong { len: usize },

    #[error("{element} is not a valid element of S_{n}")]
    NotAnElement { element: Element, n: usize },

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, CoxeterError>;
