use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::user::UserError;

static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("valid username regex"));

const RESERVED_USERNAMES: [&str; 5] = ["admin", "root", "system", "user", "test"];

const MIN_LEN: usize = 3;
const MAX_LEN: usize = 20;

/// A validated username: lowercase, 3-20 characters, starts with a letter,
/// letters/digits/underscores only, and not a reserved word.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub fn parse(input: String) -> Result<Self, UserError> {
        let normalized = input.trim().to_lowercase();

        if normalized.len() < MIN_LEN || normalized.len() > MAX_LEN {
            return Err(UserError::InvalidUsername(
                "username must be between 3 and 20 characters".to_string(),
            ));
        }

        if !USERNAME_REGEX.is_match(&normalized) {
            return Err(UserError::InvalidUsername(
                "username must start with a letter and may only contain lowercase letters, \
                 numbers, and underscores"
                    .to_string(),
            ));
        }

        if RESERVED_USERNAMES.contains(&normalized.as_str()) {
            return Err(UserError::InvalidUsername(
                "this username is not allowed".to_string(),
            ));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
