use std::fmt;

use prims_crypto::{MerkleError, RandomError, SignatureError};
use prims_types::TypeError;
use serde::{Deserialize, Serialize};

/// Errors that can occur while dispatching an operation.
///
/// Every variant maps to a stable [`ErrorCode`]. Verification mismatches are
/// never errors; they come back as `{"valid": false}`.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// The argument object did not deserialize.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// A well-formed argument is out of range or over a configured limit.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Merkle(#[from] MerkleError),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error(transparent)]
    Random(#[from] RandomError),

    /// A failure inside the host rather than in the caller's input.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result alias for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

impl DispatchError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Machine-readable classification of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownOperation(_) => ErrorCode::UnknownOperation,
            Self::Type(e) if e.is_encoding() => ErrorCode::Encoding,
            Self::Random(RandomError::Entropy(_))
            | Self::Signature(SignatureError::KeyGeneration(_))
            | Self::Internal(_) => ErrorCode::Internal,
            _ => ErrorCode::Validation,
        }
    }
}

impl PartialEq for DispatchError {
    fn eq(&self, other: &Self) -> bool {
        // Compare by display representation for test convenience.
        self.code() == other.code() && self.to_string() == other.to_string()
    }
}

impl Eq for DispatchError {}

/// Stable error classification carried in the envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Malformed or out-of-range caller input.
    #[serde(rename = "validation_error")]
    Validation,
    /// Hex decoding failed. A refinement of `Validation`.
    #[serde(rename = "encoding_error")]
    Encoding,
    #[serde(rename = "unknown_operation")]
    UnknownOperation,
    /// Entropy or encoding failure inside the host.
    #[serde(rename = "internal_error")]
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation_error",
            Self::Encoding => "encoding_error",
            Self::UnknownOperation => "unknown_operation",
            Self::Internal => "internal_error",
        }
    }

    /// `true` when the caller's input was at fault.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Internal)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The uniform failure shape: `{"error": ..., "code": ..., "isError": true}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub code: ErrorCode,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl From<&DispatchError> for ErrorEnvelope {
    fn from(err: &DispatchError) -> Self {
        Self {
            error: err.to_string(),
            code: err.code(),
            is_error: true,
        }
    }
}

impl From<DispatchError> for ErrorEnvelope {
    fn from(err: DispatchError) -> Self {
        Self::from(&err)
    }
}
