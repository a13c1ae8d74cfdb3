//! Ephemeral tokens - random opaque tokens with expiry-aware verification.
//!
//! A [`Token`] is an immutable value made of a random string, the time it was
//! generated and an optional expiry. It is created once, verified any number
//! of times, and dropped by its owner; persistence and transport are left to
//! the caller.
//!
//! - **token**: `Token`, creation options and the `TokenIssuer`
//! - **random**: Random string generation and alphabets
//! - **clock**: Injectable time source
//! - **auth**: Token authentication middleware (Bearer and Basic Auth)
//! - **config**: Issuer configuration with environment variable support
//! - **bootstrap**: Tracing initialization utilities
//!
//! # Features
//!
//! - `auth` - Token authentication middleware (enabled by default)
//! - `config` - Configuration utilities (enabled by default)
//! - `bootstrap` - Tracing setup (enabled by default)
//! - `full` - All features
//!
//! # Example
//!
//! ```rust,ignore
//! use ephemeral_token::{init_tracing, IssuerConfig, TokenAuthLayer};
//!
//! #[tokio::main]
//! async fn main() -> ephemeral_token::Result<()> {
//!     init_tracing("ephemeral_token=debug,info");
//!     let token = IssuerConfig::from_env().issuer().issue().await?;
//!     println!("one-time link: https://example.test/download?token={token}");
//!
//!     // Auth middleware
//!     let router = my_routes().layer(TokenAuthLayer::new(token));
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod random;
pub mod token;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "config")]
pub mod config;

#[cfg(feature = "bootstrap")]
pub mod bootstrap;

// Re-exports for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use random::{Alphabet, GeneratorError, OsRandomGenerator, RandomStringGenerator};
pub use token::{
    CreateOptions, Expiry, Lifetime, Result, Token, TokenError, TokenIssuer, TokenRecord,
    DEFAULT_BIT_LENGTH, DEFAULT_LIFETIME, MAX_BIT_LENGTH, MIN_BIT_LENGTH, MIN_VALUE_LENGTH,
};

#[cfg(feature = "auth")]
pub use auth::{TokenAuthLayer, TokenAuthService};

#[cfg(feature = "config")]
pub use config::IssuerConfig;

#[cfg(feature = "bootstrap")]
pub use bootstrap::{init_tracing, try_init_tracing};
