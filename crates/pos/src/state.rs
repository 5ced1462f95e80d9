use crate::di::{DependenciesInject, DependenciesInjectDeps};
use anyhow::{Context, Result};
use prometheus_client::registry::Registry;
use shared::{
    abstract_trait::{DynCacheBackend, DynJwtService},
    cache::{CacheStore, MemoryCacheStore},
    config::{Config, ConnectionPool, JwtConfig, RedisClient, RedisConfig},
};
use std::{fmt, sync::Arc};
use tokio::sync::Mutex;
use tracing::{info, warn};

const REDIS_MAX_CONNECTIONS: usize = 16;

#[derive(Clone)]
pub struct AppState {
    pub jwt_config: DynJwtService,
    pub di_container: DependenciesInject,
    pub registry: Arc<Mutex<Registry>>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("jwt_config", &self.jwt_config)
            .field("di_container", &self.di_container)
            .finish()
    }
}

impl AppState {
    pub async fn new(config: &Config, pool: ConnectionPool) -> Result<Self> {
        let cache = Self::cache_backend(config).await?;

        let product_cache_ttl = chrono::Duration::from_std(config.product_cache_ttl)
            .context("PRODUCT_CACHE_TTL_SECS is out of range")?;

        let deps = DependenciesInjectDeps::postgres(pool, cache, product_cache_ttl);

        Ok(Self::from_deps(&config.jwt_secret, deps))
    }

    pub fn from_deps(jwt_secret: &str, deps: DependenciesInjectDeps) -> Self {
        let jwt_config = Arc::new(JwtConfig::new(jwt_secret)) as DynJwtService;
        let mut registry = Registry::default();

        let di_container = DependenciesInject::new(deps, &mut registry);

        Self {
            jwt_config,
            di_container,
            registry: Arc::new(Mutex::new(registry)),
        }
    }

    async fn cache_backend(config: &Config) -> Result<DynCacheBackend> {
        let Some(url) = config.redis_url.as_deref() else {
            info!("REDIS_URL not set, using in-process product cache");
            return Ok(Arc::new(MemoryCacheStore::new()));
        };

        info!("Initializing Redis connection for product cache");
        let redis_config = RedisConfig::new(url, REDIS_MAX_CONNECTIONS, config.redis_timeout);
        let redis = RedisClient::new(&redis_config).context("Failed to create Redis pool")?;

        if let Err(e) = redis.ping().await {
            warn!("⚠️ Redis is not reachable yet, barcode lookups will bypass the cache: {e:#}");
        }

        Ok(Arc::new(CacheStore::from_client(&redis)))
    }
}
