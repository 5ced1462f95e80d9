use crate::errors::CacheError;
use async_trait::async_trait;
use chrono::Duration;
use std::sync::Arc;

pub type DynCacheBackend = Arc<dyn CacheBackendTrait + Send + Sync>;

/// Raw key/value operations against the shared cache.
///
/// Implementations report failures instead of hiding them; callers that treat
/// the cache as an optimization decide how to degrade.
#[async_trait]
pub trait CacheBackendTrait {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
    async fn del(&self, key: &str) -> Result<(), CacheError>;
    /// One SCAN step from `cursor`. A returned cursor of 0 ends the walk.
    async fn scan(&self, cursor: u64, pattern: &str) -> Result<(u64, Vec<String>), CacheError>;
    async fn del_many(&self, keys: &[String]) -> Result<u64, CacheError>;
}
