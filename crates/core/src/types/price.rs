//! Display-string price representation.
//!
//! Catalog prices are entered and stored as display strings (`"$50"`,
//! `"$19.99"`), not as a numeric currency type. Arithmetic happens on the
//! parsed `f64` value; a string without a parseable numeric prefix yields
//! `NaN`, which propagates silently through totals.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Currency symbols stripped from the front of a price string before
/// numeric parsing. At most one is removed.
const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£'];

/// A product price as a display string.
///
/// ```
/// use sable_core::Price;
///
/// let price = Price::new("$50");
/// assert_eq!(price.amount(), 50.0);
/// assert_eq!(Price::format(129.5).as_str(), "$129.50");
///
/// // Garbage parses to NaN, not an error.
/// assert!(Price::new("TBD").amount().is_nan());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Price(String);

impl Price {
    /// Create a price from a display string, stored verbatim.
    #[must_use]
    pub fn new(display: impl Into<String>) -> Self {
        Self(display.into())
    }

    /// Render a numeric amount as a display string (`"$X.XX"`).
    #[must_use]
    pub fn format(amount: f64) -> Self {
        Self(format!("${amount:.2}"))
    }

    /// Parse the numeric amount of the price.
    ///
    /// Strips a single leading currency symbol, then parses the remainder
    /// as `f64`. Returns `f64::NAN` when the remainder is not a number;
    /// callers that sum prices inherit the NaN.
    #[must_use]
    pub fn amount(&self) -> f64 {
        let trimmed = self.0.trim();
        let numeric = trimmed
            .strip_prefix(CURRENCY_SYMBOLS)
            .unwrap_or(trimmed)
            .trim_start();
        numeric.parse::<f64>().unwrap_or(f64::NAN)
    }

    /// Returns the display string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Price {
    fn from(display: &str) -> Self {
        Self::new(display)
    }
}

impl From<String> for Price {
    fn from(display: String) -> Self {
        Self(display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_with_symbol() {
        assert_eq!(Price::new("$50").amount(), 50.0);
        assert_eq!(Price::new("$19.99").amount(), 19.99);
        assert_eq!(Price::new("€7.50").amount(), 7.5);
    }

    #[test]
    fn test_amount_without_symbol() {
        assert_eq!(Price::new("42").amount(), 42.0);
    }

    #[test]
    fn test_amount_strips_single_symbol() {
        // Only one leading symbol is removed; a second one breaks the parse.
        assert!(Price::new("$$50").amount().is_nan());
    }

    #[test]
    fn test_amount_garbage_is_nan() {
        assert!(Price::new("").amount().is_nan());
        assert!(Price::new("TBD").amount().is_nan());
        assert!(Price::new("$price").amount().is_nan());
    }

    #[test]
    fn test_format() {
        assert_eq!(Price::format(130.0).as_str(), "$130.00");
        assert_eq!(Price::format(19.9).as_str(), "$19.90");
    }
}
