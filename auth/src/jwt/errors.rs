use thiserror::Error;

/// Error type for JWT operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is expired")]
    TokenExpired,

    /// Bad signature, malformed structure or missing required claim.
    #[error("Token is invalid: {0}")]
    InvalidToken(String),
}
