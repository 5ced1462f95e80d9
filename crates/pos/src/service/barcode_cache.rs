use crate::{
    abstract_trait::product::repository::DynProductQueryRepository,
    model::Product as ProductModel,
};
use chrono::Duration;
use prometheus_client::{metrics::counter::Counter, registry::Registry};
use shared::{abstract_trait::DynCacheBackend, errors::RepositoryError};
use tracing::{debug, info, warn};

/// Read-through, write-invalidate cache of active products keyed by barcode.
///
/// Keys are `product:{store_id}:{barcode}` with a lower-cased store id and a
/// trimmed barcode. A product is cached under every barcode it was looked up
/// by, so invalidation has to cover the primary barcode and all unit barcodes.
///
/// Cache backend failures never reach the caller: reads degrade to a
/// repository lookup and writes or deletes become no-ops.
#[derive(Clone)]
pub struct BarcodeCache {
    repository: DynProductQueryRepository,
    cache: DynCacheBackend,
    ttl: Duration,
    hits: Counter,
    misses: Counter,
}

pub fn cache_key(store_id: &str, barcode: &str) -> String {
    format!("product:{}:{}", store_id.to_lowercase(), barcode.trim())
}

/// MATCH pattern for every key of the store. Glob metacharacters in the store
/// id are escaped so the pattern never reaches other stores.
pub fn store_pattern(store_id: &str) -> String {
    let mut pattern = String::from("product:");
    for c in store_id.to_lowercase().chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push_str(":*");
    pattern
}

impl BarcodeCache {
    pub fn new(repository: DynProductQueryRepository, cache: DynCacheBackend, ttl: Duration) -> Self {
        Self {
            repository,
            cache,
            ttl,
            hits: Counter::default(),
            misses: Counter::default(),
        }
    }

    pub fn register(&self, registry: &mut Registry) {
        registry.register(
            "barcode_cache_hits",
            "Barcode lookups answered from the cache",
            self.hits.clone(),
        );
        registry.register(
            "barcode_cache_misses",
            "Barcode lookups that went to the database",
            self.misses.clone(),
        );
    }

    pub async fn lookup(
        &self,
        store_id: &str,
        barcode: &str,
    ) -> Result<Option<ProductModel>, RepositoryError> {
        let store_id = store_id.to_lowercase();
        let barcode = barcode.trim();

        if barcode.is_empty() {
            return Ok(None);
        }

        let key = cache_key(&store_id, barcode);

        if let Some(product) = self.read(&key).await {
            self.hits.inc();
            debug!("🎯 Cache hit for {key}");
            return Ok(Some(product));
        }
        self.misses.inc();

        let found = match self
            .repository
            .find_active_by_barcode(&store_id, barcode)
            .await?
        {
            Some(product) => Some(product),
            None => {
                self.repository
                    .find_active_by_unit_barcode(&store_id, barcode)
                    .await?
            }
        };

        if let Some(product) = &found {
            self.write(&key, product).await;
        }

        Ok(found)
    }

    pub async fn invalidate(&self, store_id: &str, barcode: &str) {
        let key = cache_key(store_id, barcode);

        if let Err(e) = self.cache.del(&key).await {
            warn!("⚠️ Failed to invalidate {key}: {e}");
        }
    }

    pub async fn invalidate_all_barcodes(&self, store_id: &str, product: &ProductModel) {
        for barcode in product.all_barcodes() {
            self.invalidate(store_id, &barcode).await;
        }
    }

    /// Drops every cached barcode of the store, deleting each scanned batch
    /// before the next step. Returns how many keys went away, including the
    /// batches removed before a failure.
    pub async fn invalidate_store(&self, store_id: &str) -> u64 {
        let pattern = store_pattern(store_id);
        let mut removed = 0;
        let mut cursor = 0;

        loop {
            let (next, keys) = match self.cache.scan(cursor, &pattern).await {
                Ok(step) => step,
                Err(e) => {
                    warn!("⚠️ Scan of {pattern} stopped after {removed} keys: {e}");
                    return removed;
                }
            };

            if !keys.is_empty() {
                match self.cache.del_many(&keys).await {
                    Ok(count) => removed += count,
                    Err(e) => {
                        warn!("⚠️ Failed to delete keys for {pattern}: {e}");
                        return removed;
                    }
                }
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        info!("🧹 Invalidated {removed} cached barcodes for store {store_id}");
        removed
    }

    async fn read(&self, key: &str) -> Option<ProductModel> {
        let raw = match self.cache.get(key).await {
            Ok(raw) => raw?,
            Err(e) => {
                debug!("Cache read for {key} skipped: {e}");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(product) => Some(product),
            Err(e) => {
                warn!("⚠️ Discarding unreadable cache entry {key}: {e}");
                None
            }
        }
    }

    async fn write(&self, key: &str, product: &ProductModel) {
        let payload = match serde_json::to_string(product) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("⚠️ Failed to serialize product for {key}: {e}");
                return;
            }
        };

        if let Err(e) = self.cache.set_with_ttl(key, &payload, self.ttl).await {
            debug!("Cache write for {key} skipped: {e}");
        }
    }
}
