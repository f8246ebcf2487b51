use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("{0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("unsupported encoding: {0} (expected \"utf8\" or \"hex\")")]
    UnsupportedEncoding(String),
}

impl TypeError {
    /// Returns `true` for hex decoding failures.
    pub fn is_encoding(&self) -> bool {
        matches!(self, Self::InvalidHex(_))
    }
}
