use std::sync::Arc;

use color_eyre::eyre::Result;
use folio_adapters::{
    auth::JwtAuthConfig,
    config::ServiceSettings,
    email::ResendEmailClient,
    persistence::PostgresUserStore,
    rate_limit::RedisRateLimiter,
};
use folio_core::{CredentialPolicy, Email};
use folio_service::{FolioService, configure_postgresql, configure_redis};
use reqwest::Client as HttpClient;
use secrecy::Secret;
use tokio::sync::RwLock;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    color_eyre::install().expect("Failed to install color_eyre");
    init_tracing().expect("Failed to initialize tracing");

    let config = ServiceSettings::load();

    let pg_pool = configure_postgresql().await;
    let user_store = PostgresUserStore::new(pg_pool);

    let redis_conn = Arc::new(RwLock::new(configure_redis()));
    let rate_limiter = RedisRateLimiter::new(
        redis_conn,
        config.rate_limit.window_seconds,
        config.rate_limit.max_attempts,
    );

    let http_client = HttpClient::builder()
        .timeout(config.email_client.timeout())
        .build()?;

    let email_client = ResendEmailClient::new(
        config.email_client.base_url.clone(),
        Email::try_from(Secret::from(config.email_client.sender.clone()))?,
        config.email_client.auth_token.clone(),
        http_client,
    );

    let jwt_config = JwtAuthConfig {
        jwt_cookie_name: config.auth.jwt.cookie_name.clone(),
        jwt_secret: config.auth.jwt.secret.clone(),
        token_ttl_in_seconds: config.auth.jwt.time_to_live,
    };

    let policy = CredentialPolicy {
        verification_code_ttl: chrono::Duration::seconds(
            config.credentials.verification_code_ttl_seconds,
        ),
        reset_token_ttl: chrono::Duration::seconds(config.credentials.reset_token_ttl_seconds),
    };

    let service = FolioService::new(user_store, email_client, rate_limiter, jwt_config, policy);

    let allowed_origins = (!config.auth.allowed_origins.is_empty())
        .then(|| config.auth.allowed_origins.clone());

    let listener = tokio::net::TcpListener::bind(&config.app.address).await?;
    service.run_standalone(listener, allowed_origins).await?;

    Ok(())
}

pub fn init_tracing() -> Result<()> {
    let fmt_layer = fmt::layer().compact();

    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();

    Ok(())
}
