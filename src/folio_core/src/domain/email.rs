use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

use regex::Regex;
use secrecy::{ExposeSecret, Secret};

use crate::domain::user::UserError;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("valid email regex"));

/// A validated, lowercase email address.
///
/// Wrapped in [`Secret`] so the address never shows up in debug output or
/// logs. Comparison and hashing go through the exposed value, which lets
/// `Email` act as a store key.
#[derive(Debug, Clone)]
pub struct Email(Secret<String>);

impl TryFrom<Secret<String>> for Email {
    type Error = UserError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        let normalized = value.expose_secret().trim().to_lowercase();

        if !EMAIL_REGEX.is_match(&normalized) {
            return Err(UserError::InvalidEmail);
        }

        Ok(Self(Secret::from(normalized)))
    }
}

impl AsRef<Secret<String>> for Email {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl PartialEq for Email {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl Eq for Email {}

impl Hash for Email {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.expose_secret().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Email, UserError> {
        Email::try_from(Secret::from(input.to_string()))
    }

    #[test]
    fn accepts_valid_email() {
        let email = parse("user@example.com").unwrap();
        assert_eq!(email.as_ref().expose_secret(), "user@example.com");
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        let email = parse("  User@Example.COM ").unwrap();
        assert_eq!(email.as_ref().expose_secret(), "user@example.com");
    }

    #[test]
    fn rejects_malformed_addresses() {
        for input in ["", "no-at-sign", "missing@tld", "spaces in@addr.com"] {
            assert!(parse(input).is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn equality_is_case_insensitive_after_parse() {
        let a = parse("a@x.com").unwrap();
        let b = parse("A@X.COM").unwrap();
        assert_eq!(a, b);
    }
}
