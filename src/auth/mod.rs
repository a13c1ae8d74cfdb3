//! Token-based authentication middleware.
//!
//! Requests present an ephemeral token as a Bearer token or as the Basic Auth
//! password; expired tokens are rejected like wrong ones.

mod middleware;

pub use middleware::{TokenAuthLayer, TokenAuthService};
