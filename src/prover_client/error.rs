use grid_domain::ChallengeParseError;
use thiserror::Error;

/// Errors returned by [`ValidatorClient`](super::ValidatorClient).
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Validator answered with a non-200 status
    #[error("Validator error (status {status}): {message}")]
    Status { status: u16, message: String },

    /// `/v1/rnd` returned something other than 32 hex-encoded bytes
    #[error("Invalid challenge: {0}")]
    Challenge(#[from] ChallengeParseError),

    #[error("No nonce meets difficulty {difficulty_bits} within {budget} attempts")]
    NonceNotFound { difficulty_bits: u32, budget: u64 },

    #[error("Nonce search task failed: {0}")]
    Search(String),
}
