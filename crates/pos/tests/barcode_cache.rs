mod support;

use chrono::Duration;
use pos::{
    model::ProductStatus,
    service::barcode_cache::{BarcodeCache, cache_key},
};
use async_trait::async_trait;
use shared::{
    abstract_trait::{CacheBackendTrait, DynCacheBackend},
    cache::MemoryCacheStore,
    errors::CacheError,
};
use std::sync::Arc;
use support::{InMemoryProducts, UnreachableCache, memory_cache, product, unit};

fn cache_over(products: &Arc<InMemoryProducts>) -> (BarcodeCache, DynCacheBackend) {
    let backend = memory_cache();
    let cache = BarcodeCache::new(products.clone(), backend.clone(), Duration::hours(1));
    (cache, backend)
}

#[tokio::test]
async fn second_lookup_is_served_from_cache() {
    let products = InMemoryProducts::with(vec![product("s1", "MAIN001", vec![])]);
    let (cache, _) = cache_over(&products);

    let first = cache.lookup("s1", "MAIN001").await.unwrap().expect("found");
    assert_eq!(products.lookups(), 1);

    let second = cache.lookup("s1", "MAIN001").await.unwrap().expect("found");
    assert_eq!(products.lookups(), 1);
    assert_eq!(first.id, second.id);
}

#[tokio::test]
async fn unit_barcode_resolves_to_owning_product() {
    let owner = product("s1", "MAIN001", vec![unit("Box", "SUB001", 12.0)]);
    let products = InMemoryProducts::with(vec![owner.clone()]);
    let (cache, backend) = cache_over(&products);

    let found = cache.lookup("s1", "SUB001").await.unwrap().expect("found");
    assert_eq!(found.id, owner.id);

    // primary miss, then unit hit
    assert_eq!(products.lookups(), 2);
    assert!(backend.get(&cache_key("s1", "SUB001")).await.unwrap().is_some());
}

#[tokio::test]
async fn misses_are_not_cached() {
    let products = InMemoryProducts::with(vec![]);
    let (cache, backend) = cache_over(&products);

    assert!(cache.lookup("s1", "NOPE").await.unwrap().is_none());
    assert!(backend.get(&cache_key("s1", "NOPE")).await.unwrap().is_none());

    assert!(cache.lookup("s1", "NOPE").await.unwrap().is_none());
    assert_eq!(products.lookups(), 4);
}

#[tokio::test]
async fn blank_barcode_is_never_looked_up() {
    let products = InMemoryProducts::with(vec![product("s1", "MAIN001", vec![])]);
    let (cache, _) = cache_over(&products);

    assert!(cache.lookup("s1", "   ").await.unwrap().is_none());
    assert_eq!(products.lookups(), 0);
}

#[tokio::test]
async fn inactive_products_are_invisible() {
    let hidden = product("s1", "MAIN001", vec![]);
    let products = InMemoryProducts::with(vec![hidden.clone()]);
    products.set_status(hidden.id, ProductStatus::Hidden);
    let (cache, _) = cache_over(&products);

    assert!(cache.lookup("s1", "MAIN001").await.unwrap().is_none());
}

#[tokio::test]
async fn store_id_and_barcode_are_normalized() {
    let products = InMemoryProducts::with(vec![product("s1", "MAIN001", vec![])]);
    let (cache, _) = cache_over(&products);

    assert!(cache.lookup("S1", " MAIN001 ").await.unwrap().is_some());
    assert!(cache.lookup("s1", "MAIN001").await.unwrap().is_some());
    assert_eq!(products.lookups(), 1);
}

#[tokio::test]
async fn stores_do_not_share_entries() {
    let products = InMemoryProducts::with(vec![product("s1", "MAIN001", vec![])]);
    let (cache, _) = cache_over(&products);

    assert!(cache.lookup("s1", "MAIN001").await.unwrap().is_some());
    assert!(cache.lookup("s2", "MAIN001").await.unwrap().is_none());
}

#[tokio::test]
async fn invalidating_all_barcodes_drops_unit_entries() {
    let owner = product("s1", "MAIN001", vec![unit("Box", "SUB001", 12.0)]);
    let products = InMemoryProducts::with(vec![owner.clone()]);
    let (cache, backend) = cache_over(&products);

    cache.lookup("s1", "MAIN001").await.unwrap();
    cache.lookup("s1", "SUB001").await.unwrap();

    cache.invalidate_all_barcodes("s1", &owner).await;

    assert!(backend.get(&cache_key("s1", "MAIN001")).await.unwrap().is_none());
    assert!(backend.get(&cache_key("s1", "SUB001")).await.unwrap().is_none());
}

#[tokio::test]
async fn store_invalidation_leaves_other_stores_alone() {
    let products = InMemoryProducts::with(vec![
        product("s1", "A", vec![]),
        product("s1", "B", vec![]),
        product("s2", "A", vec![]),
    ]);
    let (cache, backend) = cache_over(&products);

    for (store, barcode) in [("s1", "A"), ("s1", "B"), ("s2", "A")] {
        cache.lookup(store, barcode).await.unwrap();
    }

    assert_eq!(cache.invalidate_store("S1").await, 2);
    assert!(backend.get(&cache_key("s2", "A")).await.unwrap().is_some());
}

#[tokio::test]
async fn store_id_with_glob_characters_stays_scoped() {
    let products = InMemoryProducts::with(vec![
        product("s*", "A", vec![]),
        product("s1", "A", vec![]),
    ]);
    let (cache, backend) = cache_over(&products);

    cache.lookup("s*", "A").await.unwrap();
    cache.lookup("s1", "A").await.unwrap();

    assert_eq!(cache.invalidate_store("s*").await, 1);
    assert!(backend.get(&cache_key("s1", "A")).await.unwrap().is_some());
}

/// Hands out fixed SCAN pages and times out at `fail_at`.
struct PagedCache {
    inner: MemoryCacheStore,
    pages: Vec<Vec<String>>,
    fail_at: u64,
}

#[async_trait]
impl CacheBackendTrait for PagedCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.inner.get(key).await
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.inner.set_with_ttl(key, value, ttl).await
    }

    async fn del(&self, key: &str) -> Result<(), CacheError> {
        self.inner.del(key).await
    }

    async fn scan(&self, cursor: u64, _pattern: &str) -> Result<(u64, Vec<String>), CacheError> {
        if cursor == self.fail_at {
            return Err(CacheError::Timeout(250));
        }
        let next = cursor + 1;
        let page = self.pages[cursor as usize].clone();
        if next as usize == self.pages.len() {
            Ok((0, page))
        } else {
            Ok((next, page))
        }
    }

    async fn del_many(&self, keys: &[String]) -> Result<u64, CacheError> {
        self.inner.del_many(keys).await
    }
}

#[tokio::test]
async fn store_invalidation_keeps_batches_deleted_before_a_timeout() {
    let products = InMemoryProducts::with(vec![
        product("s1", "A", vec![]),
        product("s1", "B", vec![]),
        product("s1", "C", vec![]),
    ]);
    let backend = Arc::new(PagedCache {
        inner: MemoryCacheStore::new(),
        pages: vec![
            vec![cache_key("s1", "A")],
            vec![],
            vec![cache_key("s1", "B")],
            vec![cache_key("s1", "C")],
        ],
        fail_at: 3,
    });
    let cache = BarcodeCache::new(products.clone(), backend.clone(), Duration::hours(1));

    for barcode in ["A", "B", "C"] {
        cache.lookup("s1", barcode).await.unwrap();
    }

    assert_eq!(cache.invalidate_store("s1").await, 2);
    assert!(backend.get(&cache_key("s1", "A")).await.unwrap().is_none());
    assert!(backend.get(&cache_key("s1", "B")).await.unwrap().is_none());
    assert!(backend.get(&cache_key("s1", "C")).await.unwrap().is_some());
}

#[tokio::test]
async fn cache_outage_falls_back_to_repository() {
    let products = InMemoryProducts::with(vec![product("s1", "MAIN001", vec![])]);
    let cache = BarcodeCache::new(
        products.clone(),
        Arc::new(UnreachableCache),
        Duration::hours(1),
    );

    assert!(cache.lookup("s1", "MAIN001").await.unwrap().is_some());
    assert!(cache.lookup("s1", "MAIN001").await.unwrap().is_some());
    assert_eq!(products.lookups(), 2);

    cache.invalidate("s1", "MAIN001").await;
    assert_eq!(cache.invalidate_store("s1").await, 0);
}
