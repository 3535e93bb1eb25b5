use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Validation, decode, encode};
use folio_core::User;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize, ser::SerializeStruct};
use thiserror::Error;

#[derive(Clone)]
pub struct JwtAuthConfig {
    pub jwt_cookie_name: String,
    pub jwt_secret: Secret<String>,
    pub token_ttl_in_seconds: i64,
}

impl JwtAuthConfig {
    pub fn as_bytes(&self) -> &[u8] {
        self.jwt_secret.expose_secret().as_bytes()
    }
}

#[derive(Debug, Error)]
pub enum TokenAuthError {
    #[error("Token error: {0}")]
    TokenError(jsonwebtoken::errors::Error),
    #[error("Unexpected error")]
    UnexpectedError(String),
}

// Create cookie with a new JWT auth token for the given user
pub fn generate_auth_cookie<'a>(
    user: &User,
    config: &'a JwtAuthConfig,
) -> Result<Cookie<'a>, TokenAuthError> {
    let token = generate_auth_token(user, config.token_ttl_in_seconds, config.as_bytes())?;
    Ok(create_auth_cookie(token, &config.jwt_cookie_name))
}

pub fn create_removal_cookie(cookie_name: &str) -> Cookie<'_> {
    let mut cookie = create_auth_cookie(String::new(), cookie_name);
    cookie.make_removal();
    cookie
}

// Create cookie and set the value to the passed-in token string
pub fn create_auth_cookie(token: String, cookie_name: &str) -> Cookie<'_> {
    Cookie::build((cookie_name, token))
        .path("/") // apply cookie to all URLs on the server
        .http_only(true) // prevent JavaScript from accessing the cookie
        .secure(true)
        .same_site(SameSite::Lax)
        .build()
}

// Create JWT auth token
pub fn generate_auth_token(
    user: &User,
    token_ttl_seconds: i64,
    secret: &[u8],
) -> Result<String, TokenAuthError> {
    let delta = chrono::Duration::try_seconds(token_ttl_seconds).ok_or(
        TokenAuthError::UnexpectedError("Failed to create auth token duration".to_string()),
    )?;

    let exp = Utc::now()
        .checked_add_signed(delta)
        .ok_or(TokenAuthError::UnexpectedError(
            "Duration out of range".to_string(),
        ))?
        .timestamp();

    let exp: usize = exp
        .try_into()
        .map_err(|_| TokenAuthError::UnexpectedError("Failed to cast i64 to usize".to_string()))?;

    let claims = Claims {
        sub: user.email().as_ref().clone(),
        username: user.username().as_str().to_string(),
        email_verified: user.is_email_verified(),
        exp,
    };

    create_token(&claims, secret)
}

// Check if JWT auth token is valid by decoding it using the JWT secret
pub fn validate_auth_token(token: &str, config: &JwtAuthConfig) -> Result<Claims, TokenAuthError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(TokenAuthError::TokenError)
}

// Create JWT auth token by encoding claims using the JWT secret
fn create_token(claims: &Claims, secret: &[u8]) -> Result<String, TokenAuthError> {
    encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(TokenAuthError::TokenError)
}

#[derive(Debug, Deserialize, Clone)]
pub struct Claims {
    pub sub: Secret<String>,
    pub username: String,
    pub email_verified: bool,
    pub exp: usize,
}

impl Serialize for Claims {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("Claims", 4)?;
        state.serialize_field("sub", &self.sub.expose_secret())?;
        state.serialize_field("username", &self.username)?;
        state.serialize_field("email_verified", &self.email_verified)?;
        state.serialize_field("exp", &self.exp)?;
        state.end()
    }
}
