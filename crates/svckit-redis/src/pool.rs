//! Redis connection pool construction.

use deadpool_redis::{Config, Pool, Runtime};
use svckit_config::RedisConfig;
use svckit_core::{SvcError, SvcResult};
use tracing::info;

/// Creates a Redis connection pool and verifies connectivity.
pub async fn create_pool(config: &RedisConfig) -> SvcResult<Pool> {
    info!("Creating Redis connection pool...");

    let cfg = Config::from_url(&config.url);

    let pool = cfg
        .builder()
        .map_err(|e| SvcError::system(format!("invalid redis config: {e}")))?
        .max_size(config.pool_size as usize)
        .runtime(Runtime::Tokio1)
        .build()
        .map_err(|e| SvcError::system(format!("failed to create redis pool: {e}")))?;

    // Test connection
    let mut conn = pool
        .get()
        .await
        .map_err(|e| SvcError::system(format!("failed to get redis connection: {e}")))?;
    redis::cmd("PING")
        .query_async::<String>(&mut *conn)
        .await
        .map_err(|e| SvcError::system(format!("redis ping failed: {e}")))?;

    info!("Redis connection pool created successfully");

    Ok(pool)
}
