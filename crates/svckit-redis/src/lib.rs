//! # Svckit Redis
//!
//! Pooled Redis access with a typed, JSON-serialized operation surface
//! covering string, hash, set and list commands.

mod pool;
mod store;

pub use pool::create_pool;
pub use store::RedisStore;

pub use deadpool_redis::Pool;
