//! WhatsApp contact numbers.

use core::fmt;

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    #[error("informe um número de WhatsApp")]
    Empty,
    #[error("o número deve conter apenas dígitos")]
    InvalidCharacter,
    #[error("o número deve ter entre {min} e {max} dígitos")]
    Length { min: usize, max: usize },
}

/// An international phone number reduced to its digits, as `wa.me` expects.
///
/// Formatting characters (`+`, spaces, dashes, dots, parentheses) are
/// stripped; anything else is rejected.
///
/// ```
/// use autopart_core::WhatsAppNumber;
///
/// let n = WhatsAppNumber::parse("+55 (11) 99999-9999").unwrap();
/// assert_eq!(n.as_str(), "5511999999999");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WhatsAppNumber(String);

impl WhatsAppNumber {
    pub const MIN_DIGITS: usize = 10;
    pub const MAX_DIGITS: usize = 15;

    /// # Errors
    ///
    /// Returns [`PhoneError`] when the input is blank, has characters other
    /// than digits and separators, or has the wrong number of digits.
    pub fn parse(input: &str) -> Result<Self, PhoneError> {
        let mut digits = String::with_capacity(input.len());
        for c in input.trim().chars() {
            match c {
                '0'..='9' => digits.push(c),
                '+' | ' ' | '-' | '.' | '(' | ')' => {}
                _ => return Err(PhoneError::InvalidCharacter),
            }
        }

        if digits.is_empty() {
            return Err(PhoneError::Empty);
        }
        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits.len()) {
            return Err(PhoneError::Length {
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
            });
        }
        Ok(Self(digits))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WhatsAppNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for WhatsAppNumber {
    type Error = PhoneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WhatsAppNumber> for String {
    fn from(n: WhatsAppNumber) -> Self {
        n.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_formatting() {
        assert_eq!(
            WhatsAppNumber::parse("55.11.98765-4321").map(String::from),
            Ok("5511987654321".to_owned())
        );
    }

    #[test]
    fn rejects_letters() {
        assert_eq!(
            WhatsAppNumber::parse("11 9999-abcd"),
            Err(PhoneError::InvalidCharacter)
        );
    }

    #[test]
    fn enforces_digit_count() {
        assert!(matches!(
            WhatsAppNumber::parse("123456789"),
            Err(PhoneError::Length { .. })
        ));
        assert!(WhatsAppNumber::parse("1234567890").is_ok());
        assert!(WhatsAppNumber::parse("1234567890123456").is_err());
        assert_eq!(WhatsAppNumber::parse(" + "), Err(PhoneError::Empty));
    }
}
