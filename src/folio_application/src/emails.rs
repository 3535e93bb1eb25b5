//! Transactional email bodies for the verification and recovery flows.

use askama::Template;

pub const VERIFICATION_EMAIL_SUBJECT: &str = "Verify your email address";
pub const PASSWORD_RESET_EMAIL_SUBJECT: &str = "Reset your password";

#[derive(Template)]
#[template(path = "verification_email.html")]
pub struct VerificationEmail<'a> {
    pub code: &'a str,
    pub expires_in_minutes: i64,
}

#[derive(Template)]
#[template(path = "password_reset_email.html")]
pub struct PasswordResetEmail<'a> {
    pub token: &'a str,
    pub expires_in_minutes: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_email_contains_code_and_ttl() {
        let body = VerificationEmail {
            code: "123456",
            expires_in_minutes: 10,
        }
        .render()
        .unwrap();

        assert!(body.contains("123456"));
        assert!(body.contains("10 minutes"));
    }

    #[test]
    fn password_reset_email_contains_token() {
        let token = "a".repeat(64);
        let body = PasswordResetEmail {
            token: &token,
            expires_in_minutes: 10,
        }
        .render()
        .unwrap();

        assert!(body.contains(&token));
    }
}
