pub mod hashmap_user_store;
mod password_hash;
pub mod postgres_user_store;

pub use hashmap_user_store::HashmapUserStore;
pub use postgres_user_store::PostgresUserStore;
