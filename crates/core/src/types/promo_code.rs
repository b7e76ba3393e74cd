//! Promo code type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PromoCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PromoCodeError {
    /// The input is empty or only whitespace.
    #[error("promo code cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("promo code must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character other than ASCII letters, digits, `-` or `_`.
    #[error("promo code contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A normalized promo code.
///
/// Codes are case-insensitive: parsing trims surrounding whitespace and
/// uppercases the input, so `" save10 "` and `"SAVE10"` are the same code.
///
/// ## Constraints
///
/// - Length: 1-32 characters after trimming
/// - ASCII letters, digits, `-` and `_` only
///
/// ## Examples
///
/// ```
/// use cartwheel_core::PromoCode;
///
/// assert_eq!(PromoCode::parse("save10").unwrap().as_str(), "SAVE10");
/// assert!(PromoCode::parse("   ").is_err());
/// assert!(PromoCode::parse("SAVE 10").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct PromoCode(String);

impl PromoCode {
    /// Maximum length of a promo code.
    pub const MAX_LENGTH: usize = 32;

    /// Parse and normalize a `PromoCode` from user input.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input:
    /// - Is empty
    /// - Is longer than 32 characters
    /// - Contains characters other than ASCII alphanumerics, `-` or `_`
    pub fn parse(s: &str) -> Result<Self, PromoCodeError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(PromoCodeError::Empty);
        }

        if trimmed.len() > Self::MAX_LENGTH {
            return Err(PromoCodeError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(bad) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(PromoCodeError::InvalidCharacter(bad));
        }

        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `PromoCode` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PromoCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PromoCode {
    type Err = PromoCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for PromoCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for PromoCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PromoCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        assert_eq!(PromoCode::parse("save10").unwrap().as_str(), "SAVE10");
        assert_eq!(PromoCode::parse("  NewUser ").unwrap().as_str(), "NEWUSER");
        assert_eq!(PromoCode::parse("free_ship-2").unwrap().as_str(), "FREE_SHIP-2");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(PromoCode::parse(""), Err(PromoCodeError::Empty));
        assert_eq!(PromoCode::parse("   "), Err(PromoCodeError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "A".repeat(PromoCode::MAX_LENGTH + 1);
        assert!(matches!(
            PromoCode::parse(&long),
            Err(PromoCodeError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_invalid_character() {
        assert_eq!(
            PromoCode::parse("SAVE 10"),
            Err(PromoCodeError::InvalidCharacter(' '))
        );
        assert_eq!(
            PromoCode::parse("SAVE%"),
            Err(PromoCodeError::InvalidCharacter('%'))
        );
    }

    #[test]
    fn test_compare_with_str() {
        let code = PromoCode::parse("freeship").unwrap();
        assert_eq!(code, "FREESHIP");
        assert_eq!(format!("{code}"), "FREESHIP");
    }

    #[test]
    fn test_serde_roundtrip() {
        let code = PromoCode::parse("newuser").unwrap();
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"NEWUSER\"");

        let parsed: PromoCode = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, code);
    }
}
