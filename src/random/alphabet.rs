//! Symbol sets for token values.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::token::TokenError;

/// The set of characters a token value is drawn from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alphabet {
    name: Cow<'static, str>,
    symbols: Cow<'static, str>,
}

impl Alphabet {
    /// Lowercase hexadecimal.
    pub const BASE16: Alphabet = Alphabet::builtin("base16", "0123456789abcdef");

    /// Digits and lowercase letters.
    pub const BASE36: Alphabet =
        Alphabet::builtin("base36", "0123456789abcdefghijklmnopqrstuvwxyz");

    /// Alphanumerics without the look-alikes `0`, `O`, `I` and `l`.
    pub const BASE58: Alphabet = Alphabet::builtin(
        "base58",
        "123456789abcdefghijkmnopqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ",
    );

    /// All ASCII alphanumerics.
    pub const BASE62: Alphabet = Alphabet::builtin(
        "base62",
        "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ",
    );

    /// [`BASE62`](Self::BASE62) plus the URL-safe marks `!'()*-._~`.
    pub const BASE71: Alphabet = Alphabet::builtin(
        "base71",
        "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ!'()*-._~",
    );

    const BUILTINS: [Alphabet; 5] = [
        Self::BASE16,
        Self::BASE36,
        Self::BASE58,
        Self::BASE62,
        Self::BASE71,
    ];

    const fn builtin(name: &'static str, symbols: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            symbols: Cow::Borrowed(symbols),
        }
    }

    /// Build an alphabet from arbitrary symbols.
    ///
    /// Requires at least two symbols, none repeated.
    pub fn custom(symbols: impl Into<String>) -> Result<Self, TokenError> {
        let symbols = symbols.into();

        let mut seen = HashSet::new();
        if let Some(dup) = symbols.chars().find(|c| !seen.insert(*c)) {
            return Err(TokenError::InvalidAlphabet(format!(
                "symbol {dup:?} appears more than once"
            )));
        }
        if seen.len() < 2 {
            return Err(TokenError::InvalidAlphabet(format!(
                "{} symbol(s) given, at least 2 required",
                seen.len()
            )));
        }

        Ok(Self {
            name: Cow::Borrowed("custom"),
            symbols: Cow::Owned(symbols),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbols(&self) -> &str {
        &self.symbols
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.symbols.chars().count()
    }

    /// Always false for a constructed alphabet.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, c: char) -> bool {
        self.symbols.contains(c)
    }

    /// Characters needed to carry `bit_length` bits of entropy:
    /// `ceil(bit_length / log2(len))`.
    pub fn encoded_len(&self, bit_length: u32) -> usize {
        let bits_per_symbol = (self.len() as f64).log2();
        (f64::from(bit_length) / bits_per_symbol).ceil() as usize
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::BASE58
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl FromStr for Alphabet {
    type Err = TokenError;

    /// Parse a built-in alphabet by name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::BUILTINS
            .into_iter()
            .find(|alphabet| alphabet.name.eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TokenError::InvalidAlphabet(format!("unknown alphabet {s:?}")))
    }
}
