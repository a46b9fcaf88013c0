//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input has fewer than the minimum number of digits.
    #[error("phone number must contain at least {min} digits")]
    TooFewDigits {
        /// Minimum number of digits required.
        min: usize,
    },
}

/// A phone number, kept in the form the customer typed it.
///
/// Validation strips every non-digit character and requires at least ten
/// digits to remain. Formatting characters (`+`, spaces, dashes, parens)
/// are preserved in the stored value.
///
/// ```
/// use sable_core::Phone;
///
/// assert!(Phone::parse("+1 (555) 000-1234").is_ok());
/// assert!(Phone::parse("555-123").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Minimum number of digits after stripping formatting.
    pub const MIN_DIGITS: usize = 10;

    /// Parse a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or has fewer than ten digits
    /// once non-digit characters are stripped.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.trim().is_empty() {
            return Err(PhoneError::Empty);
        }

        let digit_count = s.chars().filter(char::is_ascii_digit).count();
        if digit_count < Self::MIN_DIGITS {
            return Err(PhoneError::TooFewDigits {
                min: Self::MIN_DIGITS,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the phone number as the customer entered it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns only the digits of the phone number.
    #[must_use]
    pub fn digits(&self) -> String {
        self.0.chars().filter(char::is_ascii_digit).collect()
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formatted_number() {
        let phone = Phone::parse("+1 (555) 000-1234").unwrap();
        assert_eq!(phone.as_str(), "+1 (555) 000-1234");
        assert_eq!(phone.digits(), "15550001234");
    }

    #[test]
    fn test_parse_bare_digits() {
        assert!(Phone::parse("5550001234").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Phone::parse("   "), Err(PhoneError::Empty)));
    }

    #[test]
    fn test_parse_too_few_digits() {
        assert!(matches!(
            Phone::parse("555-0012"),
            Err(PhoneError::TooFewDigits { min: 10 })
        ));
    }
}
