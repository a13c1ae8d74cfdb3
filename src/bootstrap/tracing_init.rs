//! Tracing initialization utilities.

use tracing_subscriber::{
    fmt,
    prelude::*,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter,
};

/// Initialize tracing with the given default filter.
///
/// The filter can be overridden by the `RUST_LOG` environment variable.
/// Panics if a global subscriber is already installed; see
/// [`try_init_tracing`] for the fallible form.
///
/// # Example
///
/// ```rust,no_run
/// use ephemeral_token::init_tracing;
///
/// // Debug for token issuance, info for everything else
/// init_tracing("ephemeral_token=debug,info");
/// ```
///
/// # Filter Syntax
///
/// The filter follows the `tracing_subscriber::EnvFilter` syntax:
/// - `info` - Enable info level for all targets
/// - `ephemeral_token=debug` - Log every issued token (never its value)
/// - `ephemeral_token::auth=debug` - Log rejected requests and why
pub fn init_tracing(default_filter: &str) {
    subscriber(default_filter).init();
}

/// Like [`init_tracing`], but returns an error instead of panicking when a
/// global subscriber already exists.
pub fn try_init_tracing(default_filter: &str) -> Result<(), TryInitError> {
    subscriber(default_filter).try_init()
}

fn subscriber(default_filter: &str) -> impl SubscriberInitExt {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
}
