pub mod jwt;

pub use jwt::{
    Claims, JwtAuthConfig, TokenAuthError, create_auth_cookie, create_removal_cookie,
    generate_auth_cookie, generate_auth_token, validate_auth_token,
};
