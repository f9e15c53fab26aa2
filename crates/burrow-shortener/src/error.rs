use std::fmt::{Display, Formatter};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShortenerError>;

/// Step of [`ShortenerStore::open`](crate::ShortenerStore::open) that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenStage {
    Store,
    Sequence,
    Codec,
}

impl Display for OpenStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OpenStage::Store => write!(f, "store"),
            OpenStage::Sequence => write!(f, "sequence"),
            OpenStage::Codec => write!(f, "codec"),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("failed to open shortener at {stage} stage: {reason}")]
    Open { stage: OpenStage, reason: String },
    #[error("id allocation failed: {0}")]
    Allocation(burrow_sequence::Error),
    #[error("sequence release failed: {0}")]
    Release(burrow_sequence::Error),
    #[error(transparent)]
    InvalidCode(burrow_codec::Error),
    #[error("no url stored for short code '{0}'")]
    NotFound(String),
    #[error("persistence failed: {0}")]
    Persistence(burrow_storage::StorageError),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("store is still shared by {0} other handle(s)")]
    InUse(usize),
    #[error("blocking task failed: {0}")]
    Runtime(String),
}

impl ShortenerError {
    pub(crate) fn open(stage: OpenStage, reason: impl Display) -> Self {
        Self::Open {
            stage,
            reason: reason.to_string(),
        }
    }

    /// Whether the caller should report "not found": either the code could
    /// not have been issued, or nothing is stored under it.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::InvalidCode(_) | Self::NotFound(_))
    }
}
