//! Issuer defaults read from the environment.

use std::time::Duration;

use crate::random::Alphabet;
use crate::token::{CreateOptions, Lifetime, TokenIssuer, DEFAULT_BIT_LENGTH, DEFAULT_LIFETIME};

/// Default options for issuing tokens.
///
/// Reads from environment variables with sensible defaults:
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `TOKEN_BIT_LENGTH` | `128` | Entropy per token, in bits |
/// | `TOKEN_ALPHABET` | `base58` | `base16`, `base36`, `base58`, `base62` or `base71` |
/// | `TOKEN_TTL_MINUTES` | `30` | Token lifetime; `never` disables expiry |
///
/// Values that fail to parse fall back to the default with a warning.
///
/// # Example
///
/// ```rust,ignore
/// use ephemeral_token::IssuerConfig;
///
/// let issuer = IssuerConfig::from_env().issuer();
/// let token = issuer.issue().await?;
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssuerConfig {
    /// Entropy per token (default: 128)
    pub bit_length: u32,
    /// Symbol set for token values (default: base58)
    pub alphabet: Alphabet,
    /// Token lifetime (default: 30 minutes)
    pub lifetime: Lifetime,
}

impl IssuerConfig {
    /// Create a new config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let bit_length = lookup("TOKEN_BIT_LENGTH")
            .and_then(|raw| {
                parse_or_warn("TOKEN_BIT_LENGTH", &raw, |v| v.trim().parse::<u32>().ok())
            })
            .unwrap_or(DEFAULT_BIT_LENGTH);

        let alphabet = lookup("TOKEN_ALPHABET")
            .and_then(|raw| {
                parse_or_warn("TOKEN_ALPHABET", &raw, |v| v.parse::<Alphabet>().ok())
            })
            .unwrap_or_default();

        let lifetime = lookup("TOKEN_TTL_MINUTES")
            .and_then(|raw| parse_or_warn("TOKEN_TTL_MINUTES", &raw, parse_ttl_minutes))
            .unwrap_or(Lifetime::For(DEFAULT_LIFETIME));

        Self {
            bit_length,
            alphabet,
            lifetime,
        }
    }

    /// Options for a single creation call.
    pub fn options(&self) -> CreateOptions {
        CreateOptions::new()
            .bit_length(self.bit_length)
            .alphabet(self.alphabet.clone())
            .lifetime(self.lifetime)
    }

    /// An issuer using OS entropy and these options as its defaults.
    pub fn issuer(&self) -> TokenIssuer {
        TokenIssuer::new().with_defaults(self.options())
    }
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_ttl_minutes(raw: &str) -> Option<Lifetime> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("never") {
        return Some(Lifetime::Never);
    }
    let minutes: u64 = raw.parse().ok()?;
    Some(Lifetime::For(Duration::from_secs(minutes.checked_mul(60)?)))
}

fn parse_or_warn<T>(key: &str, raw: &str, parse: impl FnOnce(&str) -> Option<T>) -> Option<T> {
    let parsed = parse(raw);
    if parsed.is_none() {
        tracing::warn!(key, value = raw, "ignoring unparsable setting, using default");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> IssuerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        IssuerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = config(&[]);
        assert_eq!(config.bit_length, 128);
        assert_eq!(config.alphabet, Alphabet::BASE58);
        assert_eq!(config.lifetime, Lifetime::For(Duration::from_secs(1800)));
        assert_eq!(config.options(), CreateOptions::default());
    }

    #[test]
    fn test_reads_all_values() {
        let config = config(&[
            ("TOKEN_BIT_LENGTH", "256"),
            ("TOKEN_ALPHABET", "base62"),
            ("TOKEN_TTL_MINUTES", "5"),
        ]);
        assert_eq!(config.bit_length, 256);
        assert_eq!(config.alphabet, Alphabet::BASE62);
        assert_eq!(config.lifetime, Lifetime::For(Duration::from_secs(300)));
    }

    #[test]
    fn test_never_expires() {
        let config = config(&[("TOKEN_TTL_MINUTES", "Never")]);
        assert_eq!(config.lifetime, Lifetime::Never);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config(&[
            ("TOKEN_BIT_LENGTH", "lots"),
            ("TOKEN_ALPHABET", "klingon"),
            ("TOKEN_TTL_MINUTES", "-5"),
        ]);
        assert_eq!(config.bit_length, 128);
        assert_eq!(config.alphabet, Alphabet::BASE58);
        assert_eq!(config.lifetime, Lifetime::For(DEFAULT_LIFETIME));
    }

    #[test]
    fn test_sub_floor_bit_length_is_kept_for_issue_to_reject() {
        // Parsing succeeds; the floor is enforced when a token is created.
        let config = config(&[("TOKEN_BIT_LENGTH", "16")]);
        assert_eq!(config.bit_length, 16);
        assert!(config.options().effective_bit_length().is_err());
    }

    #[tokio::test]
    async fn test_oversized_bit_length_is_rejected_at_issue() {
        let config = config(&[("TOKEN_BIT_LENGTH", "4000000000")]);
        assert_eq!(config.bit_length, 4_000_000_000);

        let result = config.issuer().issue().await;
        assert!(matches!(
            result,
            Err(crate::TokenError::InvalidBitLength { .. })
        ));
    }

    #[tokio::test]
    async fn test_issuer_uses_config() {
        let config = config(&[
            ("TOKEN_BIT_LENGTH", "64"),
            ("TOKEN_ALPHABET", "base16"),
            ("TOKEN_TTL_MINUTES", "never"),
        ]);
        let token = config.issuer().issue().await.unwrap();
        assert_eq!(token.value().len(), 16);
        assert!(token.value().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(token.expires_at(), None);
    }
}
