//! Default generator backed by operating-system entropy.

use async_trait::async_trait;
use rand::rngs::{OsRng, StdRng};
use rand::{Rng, SeedableRng};

use super::{Alphabet, GeneratorError, RandomStringGenerator};

/// Generator that seeds a CSPRNG from the operating system for every call.
///
/// Each symbol is drawn uniformly from the alphabet, so a value of
/// [`Alphabet::encoded_len`] symbols carries at least the requested entropy.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsRandomGenerator;

impl OsRandomGenerator {
    fn generate_blocking(bit_length: u32, alphabet: &Alphabet) -> Result<String, GeneratorError> {
        // Every Alphabet holds at least two distinct symbols.
        let symbols: Vec<char> = alphabet.symbols().chars().collect();

        let mut rng = StdRng::from_rng(OsRng)
            .map_err(|e| GeneratorError::new(format!("seeding from OS entropy: {e}")))?;

        Ok((0..alphabet.encoded_len(bit_length))
            .map(|_| symbols[rng.gen_range(0..symbols.len())])
            .collect())
    }
}

#[async_trait]
impl RandomStringGenerator for OsRandomGenerator {
    async fn generate(
        &self,
        bit_length: u32,
        alphabet: &Alphabet,
    ) -> Result<String, GeneratorError> {
        Self::generate_blocking(bit_length, alphabet)
    }
}
