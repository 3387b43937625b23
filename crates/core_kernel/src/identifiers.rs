//! Identifiers for domain entities
//!
//! Customers use a storage-assigned numeric surrogate key wrapped in a
//! newtype, so it cannot be mixed up with other integers. Addresses are keyed
//! by their postal code, which is a natural key supplied by the client.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Identifier of a persisted customer, assigned by storage on creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(i64);

impl CustomerId {
    /// Wraps a raw storage identifier
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw numeric value
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CustomerId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

impl From<i64> for CustomerId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<CustomerId> for i64 {
    fn from(id: CustomerId) -> i64 {
        id.0
    }
}

/// A postal code, the natural key of an address
///
/// Construction never fails. Surrounding whitespace is trimmed, and a code
/// made of exactly eight digits (with or without the `-` after the fifth
/// digit) is rendered as `NNNNN-NNN`, so `"01001000"` and `"01001-000"` are
/// the same key. Anything else is kept verbatim; whether it denotes a real
/// place is for the lookup service to decide.
///
/// The empty postal code is the sentinel a lookup uses to say "not found".
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PostalCode(String);

impl PostalCode {
    /// Creates a postal code in canonical form
    pub fn new(raw: impl AsRef<str>) -> Self {
        let trimmed = raw.as_ref().trim();
        let canonical = match canonical_eight_digits(trimmed) {
            Some(digits) => format!("{}-{}", &digits[..5], &digits[5..]),
            None => trimmed.to_string(),
        };
        Self(canonical)
    }

    /// The "not found" sentinel
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns only the ASCII digits of the code
    pub fn digits(&self) -> String {
        self.0.chars().filter(char::is_ascii_digit).collect()
    }
}

/// Returns the eight digits when `s` is `NNNNNNNN` or `NNNNN-NNN`
fn canonical_eight_digits(s: &str) -> Option<String> {
    let digits: String = match s.len() {
        8 => s.to_string(),
        9 if s.as_bytes()[5] == b'-' => s.chars().filter(|c| *c != '-').collect(),
        _ => return None,
    };
    (digits.len() == 8 && digits.bytes().all(|b| b.is_ascii_digit())).then_some(digits)
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PostalCode {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for PostalCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<PostalCode> for String {
    fn from(code: PostalCode) -> String {
        code.0
    }
}

impl AsRef<str> for PostalCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_id_display() {
        assert_eq!(CustomerId::new(42).to_string(), "42");
    }

    #[test]
    fn test_customer_id_parsing() {
        let parsed: CustomerId = " 17 ".parse().unwrap();
        assert_eq!(parsed, CustomerId::new(17));
        assert!("abc".parse::<CustomerId>().is_err());
    }

    #[test]
    fn test_postal_code_canonical_forms_agree() {
        assert_eq!(PostalCode::new("01001000"), PostalCode::new("01001-000"));
        assert_eq!(PostalCode::new(" 01001-000 ").as_str(), "01001-000");
    }

    #[test]
    fn test_postal_code_keeps_unknown_formats() {
        assert_eq!(PostalCode::new("SW1A 1AA").as_str(), "SW1A 1AA");
        assert_eq!(PostalCode::new("1234").as_str(), "1234");
        assert_eq!(PostalCode::new("0100a000").as_str(), "0100a000");
    }

    #[test]
    fn test_postal_code_multibyte_input_does_not_panic() {
        // nine bytes, but not a hyphenated code
        assert_eq!(PostalCode::new("ç1234567").as_str(), "ç1234567");
    }
}
