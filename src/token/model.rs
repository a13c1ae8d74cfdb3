//! The token value object.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::error::{Result, TokenError};
use crate::clock::{Clock, SystemClock};

/// Shortest accepted token value, in characters.
pub const MIN_VALUE_LENGTH: usize = 6;

/// When a token stops verifying.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Expiry {
    Never,
    /// Epoch milliseconds. The token is expired from this instant on.
    At(i64),
}

impl Expiry {
    pub fn from_millis(expires_at: Option<i64>) -> Self {
        expires_at.map_or(Self::Never, Self::At)
    }

    pub fn as_millis(self) -> Option<i64> {
        match self {
            Self::Never => None,
            Self::At(at) => Some(at),
        }
    }

    pub fn is_expired_at(self, now: i64) -> bool {
        match self {
            Self::Never => false,
            Self::At(at) => now >= at,
        }
    }
}

/// The stored shape of a token.
///
/// Input to [`Token::new`] and the serialized form of [`Token`]. Stored
/// timestamps may be fractional; they are rounded to the nearest millisecond
/// when read.
///
/// ```json
/// { "value": "8kZ2pQ…", "generatedAt": 1700000000000, "expiresAt": 1700001800000 }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    pub value: String,
    #[serde(deserialize_with = "millis")]
    pub generated_at: i64,
    #[serde(
        default,
        deserialize_with = "optional_millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires_at: Option<i64>,
}

/// An epoch-millisecond timestamp as stored: whole or fractional.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredMillis {
    Whole(i64),
    Fractional(f64),
}

impl StoredMillis {
    fn rounded<E: serde::de::Error>(self) -> std::result::Result<i64, E> {
        match self {
            Self::Whole(millis) => Ok(millis),
            Self::Fractional(millis) if millis.is_finite() => Ok(millis.round() as i64),
            Self::Fractional(millis) => Err(E::custom(format!(
                "timestamp {millis} is not a finite number"
            ))),
        }
    }
}

fn millis<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<i64, D::Error> {
    StoredMillis::deserialize(deserializer)?.rounded()
}

fn optional_millis<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<i64>, D::Error> {
    Option::<StoredMillis>::deserialize(deserializer)?
        .map(StoredMillis::rounded)
        .transpose()
}

impl TokenRecord {
    pub fn new(value: impl Into<String>, generated_at: i64, expires_at: Option<i64>) -> Self {
        Self {
            value: value.into(),
            generated_at,
            expires_at,
        }
    }
}

/// An opaque random token bound to its generation time and expiry.
///
/// Fields are fixed at construction. Build one with [`Token::create`],
/// [`TokenIssuer`](crate::TokenIssuer), or from a trusted record with
/// [`Token::new`].
///
/// ```rust
/// use ephemeral_token::{Token, TokenRecord};
///
/// let token = Token::new(TokenRecord::new("s3cr3t-value", 0, None)).unwrap();
/// assert!(token.verify("s3cr3t-value"));
/// assert!(!token.verify("S3CR3T-VALUE"));
/// assert_eq!(token.to_string(), "s3cr3t-value");
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TokenRecord", into = "TokenRecord")]
pub struct Token {
    value: String,
    generated_at: i64,
    expiry: Expiry,
}

impl Token {
    /// Validate a record against the system clock.
    pub fn new(record: TokenRecord) -> Result<Self> {
        Self::new_at(record, SystemClock.now_millis())
    }

    /// Validate a record against an explicit "now" in epoch milliseconds.
    pub fn new_at(record: TokenRecord, now: i64) -> Result<Self> {
        let length = record.value.chars().count();
        if length < MIN_VALUE_LENGTH {
            return Err(TokenError::InvalidToken {
                length,
                minimum: MIN_VALUE_LENGTH,
            });
        }

        if record.generated_at > now {
            return Err(TokenError::InvalidGenerated {
                generated_at: record.generated_at,
                now,
            });
        }

        // Expiry before generation is accepted: pre-expired tokens are legal.
        Ok(Self {
            value: record.value,
            generated_at: record.generated_at,
            expiry: Expiry::from_millis(record.expires_at),
        })
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Epoch milliseconds at which the token was generated.
    pub fn generated_at(&self) -> i64 {
        self.generated_at
    }

    /// Epoch milliseconds from which the token no longer verifies.
    pub fn expires_at(&self) -> Option<i64> {
        self.expiry.as_millis()
    }

    pub fn expiry(&self) -> Expiry {
        self.expiry
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(SystemClock.now_millis())
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expiry.is_expired_at(now)
    }

    /// Check a presented string against this token at the current time.
    ///
    /// Returns `false` for a mismatch or once the expiry instant is reached.
    pub fn verify(&self, candidate: &str) -> bool {
        self.verify_at(candidate, SystemClock.now_millis())
    }

    /// Like [`verify`](Self::verify), at an explicit time.
    pub fn verify_at(&self, candidate: &str, now: i64) -> bool {
        !self.is_expired_at(now) && candidate == self.value
    }

    pub fn to_record(&self) -> TokenRecord {
        TokenRecord {
            value: self.value.clone(),
            generated_at: self.generated_at,
            expires_at: self.expires_at(),
        }
    }
}

impl TryFrom<TokenRecord> for Token {
    type Error = TokenError;

    fn try_from(record: TokenRecord) -> Result<Self> {
        Self::new(record)
    }
}

impl From<Token> for TokenRecord {
    fn from(token: Token) -> Self {
        Self {
            value: token.value,
            generated_at: token.generated_at,
            expires_at: token.expiry.as_millis(),
        }
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("value", &"<redacted>")
            .field("generated_at", &self.generated_at)
            .field("expiry", &self.expiry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    fn token(expires_at: Option<i64>) -> Token {
        Token::new_at(TokenRecord::new("abcdefgh", NOW - 1_000, expires_at), NOW).unwrap()
    }

    #[test]
    fn test_accepts_minimum_length() {
        let token = Token::new_at(TokenRecord::new("abcdef", NOW, None), NOW).unwrap();
        assert_eq!(token.value(), "abcdef");
        assert_eq!(token.generated_at(), NOW);
        assert_eq!(token.expires_at(), None);
    }

    #[test]
    fn test_rejects_short_value() {
        let result = Token::new_at(TokenRecord::new("abcde", NOW, None), NOW);
        assert!(matches!(
            result,
            Err(TokenError::InvalidToken {
                length: 5,
                minimum: 6
            })
        ));
    }

    #[test]
    fn test_length_counts_characters() {
        // Six characters, twelve bytes.
        let token = Token::new_at(TokenRecord::new("ääääää", NOW, None), NOW);
        assert!(token.is_ok());
        let short = Token::new_at(TokenRecord::new("äää", NOW, None), NOW);
        assert!(matches!(short, Err(TokenError::InvalidToken { .. })));
    }

    #[test]
    fn test_rejects_future_generation() {
        let result = Token::new_at(TokenRecord::new("abcdefgh", NOW + 1, None), NOW);
        assert!(matches!(
            result,
            Err(TokenError::InvalidGenerated { generated_at, now })
                if generated_at == NOW + 1 && now == NOW
        ));
    }

    #[test]
    fn test_accepts_pre_expired_token() {
        let token = Token::new_at(TokenRecord::new("abcdefgh", NOW, Some(NOW - 10)), NOW).unwrap();
        assert_eq!(token.expires_at(), Some(NOW - 10));
        assert!(token.is_expired_at(NOW));
        assert!(!token.verify_at("abcdefgh", NOW));
    }

    #[test]
    fn test_verify_without_expiry() {
        let token = token(None);
        assert!(token.verify_at("abcdefgh", NOW));
        assert!(token.verify_at("abcdefgh", i64::MAX));
        assert!(!token.verify_at("abcdefgH", NOW));
        assert!(!token.verify_at("", NOW));
    }

    #[test]
    fn test_verify_before_expiry() {
        let token = token(Some(NOW + 1_000));
        assert!(token.verify_at("abcdefgh", NOW));
        assert!(token.verify_at("abcdefgh", NOW + 999));
        assert!(!token.verify_at("wrong-value", NOW));
    }

    #[test]
    fn test_expired_at_exact_instant() {
        let token = token(Some(NOW + 1_000));
        assert!(!token.verify_at("abcdefgh", NOW + 1_000));
        assert!(!token.verify_at("abcdefgh", NOW + 1_001));
        assert!(token.is_expired_at(NOW + 1_000));
        assert!(!token.is_expired_at(NOW + 999));
    }

    #[test]
    fn test_verify_is_idempotent() {
        let token = token(Some(NOW + 1_000));
        let results: Vec<bool> = (0..5).map(|_| token.verify_at("abcdefgh", NOW)).collect();
        assert!(results.iter().all(|r| *r));
        let results: Vec<bool> = (0..5).map(|_| token.verify_at("nope!!", NOW)).collect();
        assert!(results.iter().all(|r| !*r));
    }

    #[test]
    fn test_verify_against_system_clock() {
        let token = Token::new(TokenRecord::new("abcdefgh", 0, None)).unwrap();
        assert!(token.verify("abcdefgh"));
        assert!(!token.is_expired());

        let expired = Token::new(TokenRecord::new("abcdefgh", 0, Some(1))).unwrap();
        assert!(!expired.verify("abcdefgh"));
        assert!(expired.is_expired());
    }

    #[test]
    fn test_display_is_raw_value() {
        let token = token(None);
        assert_eq!(token.to_string(), "abcdefgh");
        assert_eq!(token.as_ref(), "abcdefgh");
    }

    #[test]
    fn test_debug_redacts_value() {
        let debug = format!("{:?}", token(None));
        assert!(!debug.contains("abcdefgh"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_record_json_shape() {
        let expiring = token(Some(NOW + 1_000));
        let json = serde_json::to_value(&expiring).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "value": "abcdefgh",
                "generatedAt": NOW - 1_000,
                "expiresAt": NOW + 1_000,
            })
        );

        let never = serde_json::to_value(token(None)).unwrap();
        assert!(never.get("expiresAt").is_none());
    }

    #[test]
    fn test_deserialize_validates() {
        let token: Token =
            serde_json::from_str(r#"{"value":"abcdefgh","generatedAt":1000}"#).unwrap();
        assert_eq!(token.expiry(), Expiry::Never);

        let short = serde_json::from_str::<Token>(r#"{"value":"abc","generatedAt":1000}"#);
        assert!(short.is_err());

        let future = serde_json::from_str::<Token>(&format!(
            r#"{{"value":"abcdefgh","generatedAt":{}}}"#,
            i64::MAX
        ));
        assert!(future.is_err());
    }

    #[test]
    fn test_deserialize_rounds_fractional_timestamps() {
        let record: TokenRecord = serde_json::from_str(
            r#"{"value":"abcdefgh","generatedAt":1000.4,"expiresAt":2000.5}"#,
        )
        .unwrap();
        assert_eq!(record.generated_at, 1000);
        assert_eq!(record.expires_at, Some(2001));

        let token: Token =
            serde_json::from_str(r#"{"value":"abcdefgh","generatedAt":999.6,"expiresAt":null}"#)
                .unwrap();
        assert_eq!(token.generated_at(), 1000);
        assert_eq!(token.expiry(), Expiry::Never);

        let text =
            serde_json::from_str::<TokenRecord>(r#"{"value":"abcdefgh","generatedAt":"now"}"#);
        assert!(text.is_err());
    }

    #[test]
    fn test_record_round_trip() {
        let token = token(Some(NOW + 1_000));
        let record = token.to_record();
        assert_eq!(Token::new_at(record.clone(), NOW).unwrap(), token);
        assert_eq!(TokenRecord::from(token), record);
    }
}
