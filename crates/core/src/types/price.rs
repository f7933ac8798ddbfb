//! Type-safe price representation using decimal arithmetic.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Currency-unit suffixes stripped by [`Price::parse`].
///
/// Prices arrive as free text from product forms; the most common decoration
/// is the Iranian toman word after the amount (e.g. `"1,200 تومان"`).
const CURRENCY_SUFFIXES: &[&str] = &["تومان", "ریال"];

/// Thousands separators stripped by [`Price::parse`].
///
/// U+066C is the Arabic thousands separator used in Persian-formatted numbers.
const THOUSANDS_SEPARATORS: &[char] = &[',', '\u{66c}'];

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// The input string is empty after stripping decoration.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a valid decimal number.
    #[error("price is not a valid number")]
    Invalid,
    /// The parsed amount is negative.
    #[error("price cannot be negative")]
    Negative,
}

/// A non-negative product price.
///
/// Amounts use decimal arithmetic (`rust_decimal`) rather than floats so that
/// display and storage round-trip exactly.
///
/// ## Examples
///
/// ```
/// use sabad_core::Price;
/// use rust_decimal::Decimal;
///
/// // Plain numbers
/// assert_eq!(Price::parse("19.99").unwrap().amount(), Decimal::new(1999, 2));
///
/// // Thousands separators and currency-unit suffixes are stripped
/// assert_eq!(Price::parse("1,200 تومان").unwrap().amount(), Decimal::from(1200));
///
/// // Negative amounts are rejected
/// assert!(Price::parse("-5").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Parse a `Price` from raw form text.
    ///
    /// Strips surrounding whitespace, a trailing currency-unit suffix
    /// (e.g. `تومان`), and thousands separators, then parses the rest as a
    /// decimal number.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing remains after stripping, if the remainder
    /// is not a valid decimal number, or if the amount is negative.
    pub fn parse(raw: &str) -> Result<Self, PriceError> {
        let mut text = raw.trim();

        for suffix in CURRENCY_SUFFIXES {
            if let Some(stripped) = text.strip_suffix(suffix) {
                text = stripped.trim_end();
                break;
            }
        }

        let cleaned: String = text
            .chars()
            .filter(|c| !THOUSANDS_SEPARATORS.contains(c))
            .collect();

        if cleaned.is_empty() {
            return Err(PriceError::Empty);
        }

        let amount = Decimal::from_str(&cleaned).map_err(|_| PriceError::Invalid)?;

        Self::from_decimal(amount)
    }

    /// Create a `Price` from an already-parsed decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if the amount is negative.
    pub fn from_decimal(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_integer() {
        assert_eq!(Price::parse("1200").unwrap().amount(), Decimal::from(1200));
    }

    #[test]
    fn test_parse_decimal_fraction() {
        assert_eq!(
            Price::parse("19.99").unwrap().amount(),
            Decimal::new(1999, 2)
        );
    }

    #[test]
    fn test_parse_thousands_separator() {
        assert_eq!(
            Price::parse("1,200,000").unwrap().amount(),
            Decimal::from(1_200_000)
        );
    }

    #[test]
    fn test_parse_toman_suffix() {
        assert_eq!(
            Price::parse("1,200 تومان").unwrap().amount(),
            Decimal::from(1200)
        );
    }

    #[test]
    fn test_parse_suffix_without_space() {
        assert_eq!(
            Price::parse("500تومان").unwrap().amount(),
            Decimal::from(500)
        );
    }

    #[test]
    fn test_parse_arabic_thousands_separator() {
        assert_eq!(
            Price::parse("1\u{66c}200").unwrap().amount(),
            Decimal::from(1200)
        );
    }

    #[test]
    fn test_parse_zero() {
        assert_eq!(Price::parse("0").unwrap(), Price::ZERO);
    }

    #[test]
    fn test_parse_negative() {
        assert!(matches!(Price::parse("-5"), Err(PriceError::Negative)));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(Price::parse("abc"), Err(PriceError::Invalid)));
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Price::parse(""), Err(PriceError::Empty)));
        assert!(matches!(Price::parse("  تومان"), Err(PriceError::Empty)));
    }

    #[test]
    fn test_display_roundtrip() {
        let price = Price::parse("1200.50").unwrap();
        assert_eq!(Price::parse(&price.to_string()).unwrap(), price);
    }
}
