//! Issuer configuration with environment variable support.

mod issuer;

pub use issuer::IssuerConfig;
