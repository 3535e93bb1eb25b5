//! # Folio - Credential Service Library
//!
//! This is a facade crate that re-exports all public APIs from the credential
//! service components. Use this crate to get access to signup, login, email
//! verification and password recovery functionality in one place.
//!
//! ## Usage
//!
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! folio = { path = "../folio" }
//! ```
//!
//! ## Structure
//!
//! - **Core domain types**: `Email`, `Username`, `Password`, `User`, etc.
//! - **Repository traits**: `UserStore`, `RateLimiter`, `EmailClient`
//! - **Use cases**: `SignupUseCase`, `VerifyEmailUseCase`, etc.
//! - **Adapters**: `PostgresUserStore`, `RedisRateLimiter`, `ResendEmailClient`, etc.
//! - **Service**: `FolioService` - The main entry point for the credential service

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use folio_core::*;
}

// Re-export most commonly used core types at the root level
pub use folio_core::{
    CredentialError, CredentialPolicy, Email, NewUser, Password, Pending, ResetToken, User,
    UserError, Username, VerificationCode,
};

// ============================================================================
// Repository Traits (Ports)
// ============================================================================

/// Repository trait definitions
pub mod repositories {
    pub use folio_core::{UserStore, UserStoreError};
}

// Re-export ports at root level
pub use folio_core::{
    EmailClient, RateLimitDecision, RateLimiter, RateLimiterError, UserStore, UserStoreError,
};

// ============================================================================
// Use Cases (Application Layer)
// ============================================================================

/// Application use cases
pub mod use_cases {
    pub use folio_application::*;
}

// Re-export use cases at root level
pub use folio_application::{
    CheckUsernameUseCase, ForgotPasswordUseCase, LoginOutcome, LoginUseCase, ResendCodeUseCase,
    ResetPasswordUseCase, SignupUseCase, VerifyEmailUseCase,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// HTTP route handlers
    pub mod http {
        pub use folio_adapters::http::*;
    }

    /// Persistence implementations
    pub mod persistence {
        pub use folio_adapters::persistence::*;
    }

    /// Rate limiter implementations
    pub mod rate_limit {
        pub use folio_adapters::rate_limit::*;
    }

    /// Email client implementations
    pub mod email {
        pub use folio_adapters::email::*;
    }

    /// JWT authentication utilities
    pub mod auth {
        pub use folio_adapters::auth::*;
    }

    /// Configuration
    pub mod config {
        pub use folio_adapters::config::*;
    }
}

// Re-export commonly used adapters at root level
pub use folio_adapters::{
    auth::JwtAuthConfig,
    email::{MockEmailClient, ResendEmailClient},
    persistence::{HashmapUserStore, PostgresUserStore},
    rate_limit::{InMemoryRateLimiter, RedisRateLimiter},
};

// ============================================================================
// Credential Service (Main Entry Point)
// ============================================================================

/// Main credential service
pub use folio_service::{
    FolioService, configure_postgresql, configure_redis, get_redis_client,
};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing repository traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};

pub use http;
