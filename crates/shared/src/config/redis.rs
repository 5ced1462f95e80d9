use anyhow::{Context, Result};
use deadpool_redis::{Config as PoolSettings, Pool, PoolConfig, Runtime, Timeouts};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
    pub max_connections: usize,
    pub timeout: Duration,
}

impl RedisConfig {
    pub fn new(url: impl Into<String>, max_connections: usize, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            max_connections,
            timeout,
        }
    }
}

#[derive(Clone)]
pub struct RedisClient {
    pub pool: Pool,
    pub timeout: Duration,
}

impl RedisClient {
    pub fn new(config: &RedisConfig) -> Result<Self> {
        info!("Creating redis pool (max {} connections)", config.max_connections);

        let mut settings = PoolSettings::from_url(config.url.clone());
        let mut pool_config = PoolConfig::new(config.max_connections);
        pool_config.timeouts = Timeouts {
            wait: Some(config.timeout),
            create: Some(config.timeout),
            recycle: Some(config.timeout),
        };
        settings.pool = Some(pool_config);

        let pool = settings
            .create_pool(Some(Runtime::Tokio1))
            .context("Failed to build redis pool")?;

        Ok(Self {
            pool,
            timeout: config.timeout,
        })
    }

    pub async fn ping(&self) -> Result<()> {
        let mut conn = self
            .pool
            .get()
            .await
            .context("Failed to get redis connection")?;

        info!("Pinging redis");

        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .context("Redis PING failed")?;

        info!("Pinged redis");

        Ok(())
    }
}
