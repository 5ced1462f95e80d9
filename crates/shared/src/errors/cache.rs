use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis pool error: {0}")]
    Pool(#[from] deadpool_redis::PoolError),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Cache operation timed out after {0}ms")]
    Timeout(u64),

    #[error("Cache payload error: {0}")]
    Serde(#[from] serde_json::Error),
}
