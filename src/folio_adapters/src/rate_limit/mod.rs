pub mod in_memory_rate_limiter;
pub mod redis_rate_limiter;

pub use in_memory_rate_limiter::InMemoryRateLimiter;
pub use redis_rate_limiter::RedisRateLimiter;
