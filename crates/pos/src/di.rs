use crate::{
    abstract_trait::{
        product::{
            repository::{DynProductCommandRepository, DynProductQueryRepository},
            service::{DynProductCommandService, DynProductQueryService},
        },
        store::{DynStoreRepository, DynSubscriptionService},
        store_account::{DynStoreAccountRepository, DynStoreAccountService},
    },
    repository::{
        StoreAccountRepository, StoreRepository,
        product::{ProductCommandRepository, ProductQueryRepository},
    },
    service::{
        barcode_cache::BarcodeCache,
        product::{ProductCommandService, ProductQueryService},
        store_account::StoreAccountService,
        subscription::SubscriptionService,
    },
};
use chrono::Duration;
use prometheus_client::registry::Registry;
use shared::{abstract_trait::DynCacheBackend, config::ConnectionPool};
use std::{fmt, sync::Arc};

#[derive(Clone)]
pub struct DependenciesInject {
    pub product_query: DynProductQueryService,
    pub product_command: DynProductCommandService,
    pub subscription: DynSubscriptionService,
    pub store_account: DynStoreAccountService,
    pub barcode_cache: Arc<BarcodeCache>,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("product_query", &"ProductQueryService")
            .field("product_command", &"ProductCommandService")
            .field("subscription", &"SubscriptionService")
            .field("store_account", &"StoreAccountService")
            .finish()
    }
}

#[derive(Clone)]
pub struct DependenciesInjectDeps {
    pub product_query_repo: DynProductQueryRepository,
    pub product_command_repo: DynProductCommandRepository,
    pub store_repo: DynStoreRepository,
    pub store_account_repo: DynStoreAccountRepository,
    pub cache: DynCacheBackend,
    pub product_cache_ttl: Duration,
}

impl DependenciesInjectDeps {
    pub fn postgres(pool: ConnectionPool, cache: DynCacheBackend, product_cache_ttl: Duration) -> Self {
        Self {
            product_query_repo: Arc::new(ProductQueryRepository::new(pool.clone())),
            product_command_repo: Arc::new(ProductCommandRepository::new(pool.clone())),
            store_repo: Arc::new(StoreRepository::new(pool.clone())),
            store_account_repo: Arc::new(StoreAccountRepository::new(pool)),
            cache,
            product_cache_ttl,
        }
    }
}

impl DependenciesInject {
    pub fn new(deps: DependenciesInjectDeps, registry: &mut Registry) -> Self {
        let DependenciesInjectDeps {
            product_query_repo,
            product_command_repo,
            store_repo,
            store_account_repo,
            cache,
            product_cache_ttl,
        } = deps;

        let barcode_cache = Arc::new(BarcodeCache::new(
            product_query_repo.clone(),
            cache,
            product_cache_ttl,
        ));
        barcode_cache.register(registry);

        let product_query = Arc::new(ProductQueryService::new(
            product_query_repo.clone(),
            barcode_cache.clone(),
            registry,
        )) as DynProductQueryService;

        let product_command = Arc::new(ProductCommandService::new(
            product_command_repo,
            product_query_repo,
            barcode_cache.clone(),
            registry,
        )) as DynProductCommandService;

        let subscription =
            Arc::new(SubscriptionService::new(store_repo, registry)) as DynSubscriptionService;

        let store_account = Arc::new(StoreAccountService::new(store_account_repo, registry))
            as DynStoreAccountService;

        Self {
            product_query,
            product_command,
            subscription,
            store_account,
            barcode_cache,
        }
    }
}
