use std::{sync::LazyLock, time::Duration};

use axum::http::HeaderValue;
use config::{Config, ConfigError, Environment, File};
use secrecy::Secret;
use serde::Deserialize;

use super::constants::{env, prod};

static SETTINGS: LazyLock<ServiceSettings> =
    LazyLock::new(|| ServiceSettings::build().expect("Failed to load service settings"));

/// Service configuration, loaded once from `folio.json` (optional) plus
/// `FOLIO__*` environment variables. Env vars win.
#[derive(Debug, Deserialize)]
pub struct ServiceSettings {
    pub app: AppSettings,
    pub postgres: PostgresSettings,
    pub redis: RedisSettings,
    pub auth: AuthSettings,
    pub email_client: EmailClientSettings,
    pub credentials: CredentialSettings,
    pub rate_limit: RateLimitSettings,
}

impl ServiceSettings {
    pub fn load() -> &'static Self {
        &SETTINGS
    }

    fn build() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Config::builder()
            .set_default("app.address", prod::APP_ADDRESS)?
            .set_default("redis.host_name", "127.0.0.1")?
            .set_default("auth.jwt.cookie_name", "token")?
            .set_default("auth.jwt.time_to_live", 604_800_i64)?
            .set_default("auth.allowed_origins", Vec::<String>::new())?
            .set_default("email_client.base_url", prod::email_client::BASE_URL)?
            .set_default("email_client.sender", prod::email_client::SENDER)?
            .set_default(
                "email_client.timeout_in_millis",
                prod::email_client::TIMEOUT.as_millis() as u64,
            )?
            .set_default("credentials.verification_code_ttl_seconds", 600_i64)?
            .set_default("credentials.reset_token_ttl_seconds", 600_i64)?
            .set_default("rate_limit.window_seconds", 900_u64)?
            .set_default("rate_limit.max_attempts", 5_u32)?
            .set_override_option("postgres.url", std::env::var(env::DATABASE_URL_ENV_VAR).ok())?
            .add_source(File::with_name("folio").required(false))
            .add_source(
                Environment::with_prefix("FOLIO")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("auth.allowed_origins"),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Deserialize)]
pub struct AppSettings {
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct PostgresSettings {
    pub url: Secret<String>,
}

#[derive(Debug, Deserialize)]
pub struct RedisSettings {
    pub host_name: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthSettings {
    pub jwt: JwtSettings,
    pub allowed_origins: AllowedOrigins,
}

#[derive(Debug, Deserialize)]
pub struct JwtSettings {
    pub secret: Secret<String>,
    pub cookie_name: String,
    /// Token lifetime in seconds.
    pub time_to_live: i64,
}

#[derive(Debug, Deserialize)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub sender: String,
    pub auth_token: Secret<String>,
    pub timeout_in_millis: u64,
}

impl EmailClientSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_in_millis)
    }
}

#[derive(Debug, Deserialize)]
pub struct CredentialSettings {
    pub verification_code_ttl_seconds: i64,
    pub reset_token_ttl_seconds: i64,
}

#[derive(Debug, Deserialize)]
pub struct RateLimitSettings {
    pub window_seconds: u64,
    pub max_attempts: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AllowedOrigins(Vec<String>);

impl AllowedOrigins {
    pub fn new(origins: Vec<String>) -> Self {
        Self(origins)
    }

    pub fn contains(&self, origin: &HeaderValue) -> bool {
        self.0
            .iter()
            .any(|allowed| origin.as_bytes() == allowed.as_bytes())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_origins_matches_exact_values_only() {
        let origins = AllowedOrigins::new(vec![
            "https://portfoliomaker.app".to_string(),
            "http://localhost:3000".to_string(),
        ]);

        assert!(origins.contains(&HeaderValue::from_static("http://localhost:3000")));
        assert!(!origins.contains(&HeaderValue::from_static("http://localhost:3001")));
        assert!(!origins.contains(&HeaderValue::from_static("https://evil.example.com")));
    }

    #[test]
    fn empty_origin_list_allows_nothing() {
        let origins = AllowedOrigins::new(Vec::new());
        assert!(origins.is_empty());
        assert!(!origins.contains(&HeaderValue::from_static("http://localhost:3000")));
    }
}
