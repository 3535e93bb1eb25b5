use std::fmt;

use rand::Rng;
use subtle::ConstantTimeEq;

use crate::domain::user::UserError;

const TOKEN_BYTES: usize = 32;
const TOKEN_LEN: usize = TOKEN_BYTES * 2;

/// A single-use password-reset token: 32 random bytes, lowercase hex.
///
/// Long enough that it is delivered by email link or paste rather than typed.
#[derive(Clone)]
pub struct ResetToken(String);

impl ResetToken {
    pub fn new() -> Self {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rng().fill(&mut bytes);

        let hex = bytes.iter().map(|b| format!("{b:02x}")).collect();
        Self(hex)
    }

    pub fn parse(input: String) -> Result<Self, UserError> {
        let normalized = input.trim().to_lowercase();

        if normalized.len() != TOKEN_LEN
            || !normalized.bytes().all(|b| b.is_ascii_hexdigit())
        {
            return Err(UserError::InvalidResetToken);
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ResetToken {
    fn default() -> Self {
        Self::new()
    }
}

// Constant-time comparison; equal lengths are guaranteed by construction.
impl PartialEq for ResetToken {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

impl Eq for ResetToken {}

impl fmt::Debug for ResetToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResetToken(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_token_is_64_hex_chars() {
        let token = ResetToken::new();
        assert_eq!(token.as_str().len(), 64);
        assert!(token.as_str().bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn two_tokens_differ() {
        assert_ne!(ResetToken::new(), ResetToken::new());
    }

    #[test]
    fn parse_round_trips_generated_tokens() {
        let token = ResetToken::new();
        let parsed = ResetToken::parse(token.as_str().to_string()).unwrap();
        assert_eq!(token, parsed);
    }

    #[test]
    fn parse_rejects_bad_input() {
        for input in ["", "abcd", &"g".repeat(64), &"a".repeat(63)] {
            assert!(ResetToken::parse(input.to_string()).is_err(), "accepted {input:?}");
        }
    }
}
