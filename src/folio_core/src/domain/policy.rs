use chrono::Duration;

/// Validity windows for the two secret-generation policies. Both are
/// configuration-driven, defaulting to ten minutes each.
#[derive(Debug, Clone, Copy)]
pub struct CredentialPolicy {
    pub verification_code_ttl: Duration,
    pub reset_token_ttl: Duration,
}

impl Default for CredentialPolicy {
    fn default() -> Self {
        Self {
            verification_code_ttl: Duration::minutes(10),
            reset_token_ttl: Duration::minutes(10),
        }
    }
}
