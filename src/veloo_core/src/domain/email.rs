use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is a valid regex"));

/// Returns true when `candidate` contains a `local@domain.tld` shape.
pub fn is_email_shaped(candidate: &str) -> bool {
    EMAIL_SHAPE.is_match(candidate)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailError {
    #[error("Email address is required")]
    Empty,
    #[error("Invalid email format")]
    InvalidFormat,
}

/// An email address that passed the shape check.
///
/// The raw text is kept as entered so the address sent to the service is the
/// one the seller typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn parse(raw: impl Into<String>) -> Result<Self, EmailError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(EmailError::Empty);
        }
        if !is_email_shaped(&raw) {
            return Err(EmailError::InvalidFormat);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::Fake;
    use fake::faker::internet::en::SafeEmail;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_accepts_generated_addresses() {
        for _ in 0..20 {
            let address: String = SafeEmail().fake();
            assert!(Email::parse(address.clone()).is_ok(), "{address}");
        }
    }

    #[test]
    fn test_rejects_blank_and_malformed() {
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));
        assert_eq!(Email::parse("seller"), Err(EmailError::InvalidFormat));
        assert_eq!(Email::parse("seller@shop"), Err(EmailError::InvalidFormat));
        assert_eq!(Email::parse("@shop.com"), Err(EmailError::InvalidFormat));
    }

    #[test]
    fn test_keeps_raw_text() {
        let email = Email::parse("Seller@Shop.ng").unwrap();
        assert_eq!(email.as_str(), "Seller@Shop.ng");
    }

    #[test]
    fn test_deserialize_rejects_malformed() {
        let result: Result<Email, _> = serde_json::from_str("\"not-an-email\"");
        assert!(result.is_err());
    }

    #[quickcheck]
    fn prop_strings_without_at_sign_are_rejected(candidate: String) -> bool {
        candidate.contains('@') || Email::parse(candidate).is_err()
    }
}
