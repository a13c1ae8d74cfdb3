//! Errors raised while constructing or creating tokens.

use thiserror::Error;

use crate::random::GeneratorError;

/// Error returned when a token cannot be constructed or created.
///
/// Every variant is a terminal input-validation failure; retrying the same
/// call with the same inputs fails the same way. Verification never produces
/// one of these.
#[derive(Error, Debug)]
pub enum TokenError {
    /// The token value is shorter than [`MIN_VALUE_LENGTH`](super::MIN_VALUE_LENGTH).
    #[error("invalid token: value has {length} characters, at least {minimum} required")]
    InvalidToken { length: usize, minimum: usize },

    /// The generation timestamp lies in the future.
    #[error("invalid generated: timestamp {generated_at} is later than now ({now})")]
    InvalidGenerated { generated_at: i64, now: i64 },

    /// The expiry cannot be expressed as epoch milliseconds.
    #[error("invalid expiry: {0}")]
    InvalidExpiry(String),

    /// The requested entropy, snapped down to a byte boundary, lies outside
    /// [`MIN_BIT_LENGTH`](super::MIN_BIT_LENGTH)..=[`MAX_BIT_LENGTH`](super::MAX_BIT_LENGTH).
    #[error(
        "invalid bit-length: {requested} bits (snapped to {snapped}), \
         must be between {minimum} and {maximum}"
    )]
    InvalidBitLength {
        requested: u32,
        snapped: u32,
        minimum: u32,
        maximum: u32,
    },

    /// The alphabet cannot encode random output.
    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),

    #[error(transparent)]
    Generator(#[from] GeneratorError),
}

pub type Result<T> = std::result::Result<T, TokenError>;
