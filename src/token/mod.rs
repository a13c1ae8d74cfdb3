//! Ephemeral tokens: construction, creation and verification.

mod create;
mod error;
mod model;

pub use create::{
    CreateOptions, Lifetime, TokenIssuer, DEFAULT_BIT_LENGTH, DEFAULT_LIFETIME, MAX_BIT_LENGTH,
    MIN_BIT_LENGTH,
};
pub use error::{Result, TokenError};
pub use model::{Expiry, Token, TokenRecord, MIN_VALUE_LENGTH};
