//! Random string generation.
//!
//! Token values come from a [`RandomStringGenerator`]. The crate ships
//! [`OsRandomGenerator`]; tests and embedders can inject their own.

mod alphabet;
mod os;

use async_trait::async_trait;
use thiserror::Error;

pub use alphabet::Alphabet;
pub use os::OsRandomGenerator;

/// Failure reported by a [`RandomStringGenerator`].
#[derive(Error, Debug)]
#[error("random string generation failed: {0}")]
pub struct GeneratorError(String);

impl GeneratorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Produces printable random strings carrying a given amount of entropy.
///
/// Implementations return [`Alphabet::encoded_len`] characters for the
/// requested bit length, each drawn uniformly from the alphabet.
#[async_trait]
pub trait RandomStringGenerator: Send + Sync {
    async fn generate(&self, bit_length: u32, alphabet: &Alphabet)
        -> Result<String, GeneratorError>;
}
