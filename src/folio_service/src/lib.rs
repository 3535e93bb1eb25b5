mod helpers;
mod service;
mod tracing;

pub use helpers::{configure_postgresql, configure_redis, get_postgres_pool, get_redis_client};
pub use service::FolioService;

// Re-export commonly used types
pub use folio_core::{Email, EmailClient, RateLimiter, UserStore};
