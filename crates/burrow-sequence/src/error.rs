use thiserror::Error;

/// Errors returned by sequence initialization, allocation and release.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid block size {0}; expected a value greater than zero")]
    InvalidBlockSize(u64),
    #[error("durable counter unavailable: {0}")]
    Counter(String),
    #[error("id space exhausted")]
    Exhausted,
    #[error("sequence state lock is poisoned")]
    StatePoisoned,
}
