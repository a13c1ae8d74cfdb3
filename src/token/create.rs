//! Token creation.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use super::error::{Result, TokenError};
use super::model::{Expiry, Token, TokenRecord};
use crate::clock::{self, Clock, SystemClock};
use crate::random::{Alphabet, OsRandomGenerator, RandomStringGenerator};

/// Least entropy a created token may carry.
pub const MIN_BIT_LENGTH: u32 = 32;

/// Most entropy a created token may carry.
pub const MAX_BIT_LENGTH: u32 = 8192;

/// Entropy used when none is requested.
pub const DEFAULT_BIT_LENGTH: u32 = 128;

/// Lifetime used when none is requested.
pub const DEFAULT_LIFETIME: Duration = Duration::from_secs(30 * 60);

/// How long a newly created token stays valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifetime {
    /// Relative to the moment creation starts.
    For(Duration),
    /// Absolute, in epoch milliseconds.
    AtMillis(i64),
    /// Absolute, rounded to the nearest millisecond.
    At(SystemTime),
    Never,
}

impl Lifetime {
    /// Resolve against `now` (epoch milliseconds).
    pub fn resolve(self, now: i64) -> Result<Expiry> {
        match self {
            Self::Never => Ok(Expiry::Never),
            Self::AtMillis(at) => Ok(Expiry::At(at)),
            Self::At(time) => clock::round_to_millis(time).map(Expiry::At).ok_or_else(|| {
                TokenError::InvalidExpiry(format!(
                    "{time:?} is not representable as epoch milliseconds"
                ))
            }),
            Self::For(duration) => clock::duration_to_millis(duration)
                .and_then(|millis| now.checked_add(millis))
                .map(Expiry::At)
                .ok_or_else(|| {
                    TokenError::InvalidExpiry(format!(
                        "{duration:?} from {now} overflows epoch milliseconds"
                    ))
                }),
        }
    }
}

impl Default for Lifetime {
    fn default() -> Self {
        Self::For(DEFAULT_LIFETIME)
    }
}

/// Parameters for creating a single token.
///
/// ```rust
/// use std::time::Duration;
/// use ephemeral_token::{Alphabet, CreateOptions, Lifetime};
///
/// let options = CreateOptions::new()
///     .bit_length(256)
///     .alphabet(Alphabet::BASE62)
///     .lifetime(Lifetime::For(Duration::from_secs(3600)));
/// assert_eq!(options.bit_length, 256);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateOptions {
    /// Requested entropy; snapped down to a multiple of 8.
    pub bit_length: u32,
    pub alphabet: Alphabet,
    pub lifetime: Lifetime,
}

impl CreateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bit_length(mut self, bit_length: u32) -> Self {
        self.bit_length = bit_length;
        self
    }

    pub fn alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    pub fn lifetime(mut self, lifetime: Lifetime) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn never_expires(self) -> Self {
        self.lifetime(Lifetime::Never)
    }

    /// The bit length actually used, after snapping to a byte boundary and
    /// checking against [`MIN_BIT_LENGTH`] and [`MAX_BIT_LENGTH`].
    pub fn effective_bit_length(&self) -> Result<u32> {
        let snapped = self.bit_length / 8 * 8;
        if !(MIN_BIT_LENGTH..=MAX_BIT_LENGTH).contains(&snapped) {
            return Err(TokenError::InvalidBitLength {
                requested: self.bit_length,
                snapped,
                minimum: MIN_BIT_LENGTH,
                maximum: MAX_BIT_LENGTH,
            });
        }
        Ok(snapped)
    }
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            bit_length: DEFAULT_BIT_LENGTH,
            alphabet: Alphabet::default(),
            lifetime: Lifetime::default(),
        }
    }
}

/// Creates tokens from an injected generator and clock.
///
/// ```rust,ignore
/// use ephemeral_token::{CreateOptions, TokenIssuer};
///
/// let issuer = TokenIssuer::new();
/// let session = issuer.issue().await?;
/// let link = issuer.issue_with(CreateOptions::new().bit_length(256)).await?;
/// ```
#[derive(Clone)]
pub struct TokenIssuer {
    generator: Arc<dyn RandomStringGenerator>,
    clock: Arc<dyn Clock>,
    defaults: CreateOptions,
}

impl TokenIssuer {
    /// Issuer using OS entropy, the system clock and default options.
    pub fn new() -> Self {
        Self {
            generator: Arc::new(OsRandomGenerator),
            clock: Arc::new(SystemClock),
            defaults: CreateOptions::default(),
        }
    }

    pub fn with_generator(mut self, generator: Arc<dyn RandomStringGenerator>) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Options used by [`issue`](Self::issue).
    pub fn with_defaults(mut self, defaults: CreateOptions) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn defaults(&self) -> &CreateOptions {
        &self.defaults
    }

    /// Create a token with this issuer's default options.
    pub async fn issue(&self) -> Result<Token> {
        self.issue_with(self.defaults.clone()).await
    }

    /// Create a token with explicit options.
    ///
    /// Validation happens before any entropy is consumed. The expiry is
    /// resolved against the time at which this call starts; the generation
    /// timestamp is taken once the generator returns.
    pub async fn issue_with(&self, options: CreateOptions) -> Result<Token> {
        let bit_length = options.effective_bit_length()?;
        let expiry = options.lifetime.resolve(self.clock.now_millis())?;

        let value = self.generator.generate(bit_length, &options.alphabet).await?;

        let generated_at = self.clock.now_millis();
        let token = Token::new_at(
            TokenRecord {
                value,
                generated_at,
                expires_at: expiry.as_millis(),
            },
            generated_at,
        )?;

        tracing::debug!(
            bit_length,
            alphabet = %options.alphabet,
            generated_at,
            expires_at = ?token.expires_at(),
            "issued token"
        );
        Ok(token)
    }
}

impl Default for TokenIssuer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl Token {
    /// Create a token from OS entropy and the system clock.
    ///
    /// ```rust
    /// use ephemeral_token::{CreateOptions, Token};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> ephemeral_token::Result<()> {
    /// let token = Token::create(CreateOptions::default()).await?;
    /// assert!(token.verify(token.value()));
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create(options: CreateOptions) -> Result<Token> {
        TokenIssuer::new().issue_with(options).await
    }
}
