use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid short code '{code}': {reason}")]
    InvalidCode { code: String, reason: String },
    #[error("codec configuration rejected: {0}")]
    Build(String),
}

impl Error {
    pub(crate) fn invalid(code: &str, reason: impl Into<String>) -> Self {
        Self::InvalidCode {
            code: code.to_string(),
            reason: reason.into(),
        }
    }
}
