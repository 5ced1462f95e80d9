use crate::{abstract_trait::CacheBackendTrait, config::RedisClient, errors::CacheError};
use async_trait::async_trait;
use chrono::Duration;
use deadpool_redis::{Connection, Pool};
use std::{future::Future, sync::Arc, time::Duration as StdDuration};
use tracing::debug;

const SCAN_BATCH: usize = 500;

/// Redis-backed cache. Every round trip is bounded by `timeout` so an
/// unreachable server surfaces as a fast `CacheError::Timeout`.
#[derive(Clone)]
pub struct CacheStore {
    redis_pool: Arc<Pool>,
    timeout: StdDuration,
}

impl CacheStore {
    pub fn new(redis_pool: Pool, timeout: StdDuration) -> Self {
        Self {
            redis_pool: Arc::new(redis_pool),
            timeout,
        }
    }

    pub fn from_client(client: &RedisClient) -> Self {
        Self::new(client.pool.clone(), client.timeout)
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, CacheError>
    where
        F: Future<Output = Result<T, CacheError>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout(self.timeout.as_millis() as u64)),
        }
    }

    async fn get_conn(&self) -> Result<Connection, CacheError> {
        Ok(self.redis_pool.get().await?)
    }
}

#[async_trait]
impl CacheBackendTrait for CacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.bounded(async {
            let mut conn = self.get_conn().await?;
            let value: Option<String> = redis::cmd("GET").arg(key).query_async(&mut conn).await?;
            Ok(value)
        })
        .await
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let seconds = ttl.num_seconds().max(1) as u64;

        self.bounded(async {
            let mut conn = self.get_conn().await?;
            redis::cmd("SET")
                .arg(key)
                .arg(value)
                .arg("EX")
                .arg(seconds)
                .query_async::<()>(&mut conn)
                .await?;
            debug!("Cached key '{}' with TTL {}s", key, seconds);
            Ok(())
        })
        .await
    }

    async fn del(&self, key: &str) -> Result<(), CacheError> {
        self.bounded(async {
            let mut conn = self.get_conn().await?;
            redis::cmd("DEL").arg(key).query_async::<()>(&mut conn).await?;
            Ok(())
        })
        .await
    }

    async fn scan(&self, cursor: u64, pattern: &str) -> Result<(u64, Vec<String>), CacheError> {
        self.bounded(async {
            let mut conn = self.get_conn().await?;
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;
            Ok((next, batch))
        })
        .await
    }

    async fn del_many(&self, keys: &[String]) -> Result<u64, CacheError> {
        if keys.is_empty() {
            return Ok(0);
        }

        self.bounded(async {
            let mut conn = self.get_conn().await?;
            let removed: u64 = redis::cmd("DEL").arg(keys).query_async(&mut conn).await?;
            Ok(removed)
        })
        .await
    }
}
