#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use pos::{
    abstract_trait::{
        product::repository::{ProductCommandRepositoryTrait, ProductQueryRepositoryTrait},
        store::StoreRepositoryTrait,
        store_account::StoreAccountRepositoryTrait,
    },
    di::DependenciesInjectDeps,
    domain::requests::product::FindAllProducts,
    model::{Product, ProductDraft, ProductStatus, ProductUnit, Store, StoreAccount},
    state::AppState,
};
use shared::{
    abstract_trait::{CacheBackendTrait, DynCacheBackend, JwtServiceTrait},
    cache::MemoryCacheStore,
    config::JwtConfig,
    errors::{CacheError, RepositoryError},
};
use sqlx::types::Json;
use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret";

pub fn unit(name: &str, barcode: &str, factor: f64) -> ProductUnit {
    ProductUnit {
        unit_name: name.into(),
        barcode: barcode.into(),
        selling_price: 10.0 * factor,
        conversion_factor: factor,
    }
}

pub fn product(store_id: &str, barcode: &str, units: Vec<ProductUnit>) -> Product {
    let now = Utc::now();
    Product {
        id: Uuid::new_v4(),
        store_id: store_id.into(),
        name: format!("Product {barcode}"),
        barcode: barcode.into(),
        cost_price: 5.0,
        price: 10.0,
        stock: 100,
        status: ProductStatus::Active,
        low_stock_alert: 10,
        vat_percentage: 0.0,
        vat_inclusive: false,
        units: Json(units),
        multi_warehouse_distribution: Json(Vec::new()),
        created_at: now,
        updated_at: now,
    }
}

/// Product table kept in memory. Counts every barcode query that reaches it.
#[derive(Default)]
pub struct InMemoryProducts {
    rows: Mutex<Vec<Product>>,
    lookups: AtomicUsize,
}

impl InMemoryProducts {
    pub fn with(products: Vec<Product>) -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(products),
            lookups: AtomicUsize::new(0),
        })
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn all(&self) -> Vec<Product> {
        self.rows.lock().unwrap().clone()
    }

    /// Writes straight to the table, the way another process would.
    pub fn set_status(&self, id: Uuid, status: ProductStatus) {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|p| p.id == id) {
            row.status = status;
        }
    }

    fn find(&self, pred: impl Fn(&Product) -> bool) -> Option<Product> {
        self.rows.lock().unwrap().iter().find(|p| pred(p)).cloned()
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for InMemoryProducts {
    async fn find_all(
        &self,
        store_id: &str,
        req: &FindAllProducts,
    ) -> Result<(Vec<Product>, i64), RepositoryError> {
        let search = req.search.to_lowercase();
        let matching: Vec<Product> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.store_id == store_id)
            .filter(|p| {
                search.is_empty()
                    || p.name.to_lowercase().contains(&search)
                    || p.barcode.contains(&search)
            })
            .cloned()
            .collect();

        let total = matching.len() as i64;
        let offset = ((i64::from(req.page) - 1).max(0) * i64::from(req.page_size)) as usize;
        let page = matching
            .into_iter()
            .skip(offset)
            .take(req.page_size as usize)
            .collect();

        Ok((page, total))
    }

    async fn find_by_id(&self, store_id: &str, id: Uuid) -> Result<Option<Product>, RepositoryError> {
        Ok(self.find(|p| p.store_id == store_id && p.id == id))
    }

    async fn find_active_by_barcode(
        &self,
        store_id: &str,
        barcode: &str,
    ) -> Result<Option<Product>, RepositoryError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.find(|p| {
            p.store_id == store_id && p.status == ProductStatus::Active && p.barcode == barcode
        }))
    }

    async fn find_active_by_unit_barcode(
        &self,
        store_id: &str,
        barcode: &str,
    ) -> Result<Option<Product>, RepositoryError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.find(|p| {
            p.store_id == store_id
                && p.status == ProductStatus::Active
                && p.units.iter().any(|u| u.barcode == barcode)
        }))
    }

    async fn find_low_stock(&self, store_id: &str) -> Result<Vec<Product>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.store_id == store_id && p.is_low_stock())
            .cloned()
            .collect())
    }

    async fn find_known_barcodes(
        &self,
        store_id: &str,
        exclude: Option<Uuid>,
    ) -> Result<Vec<String>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.store_id == store_id && Some(p.id) != exclude)
            .flat_map(|p| p.all_barcodes())
            .collect())
    }

    async fn find_unit_barcodes(
        &self,
        store_id: &str,
        exclude: Option<Uuid>,
    ) -> Result<Vec<String>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.store_id == store_id && Some(p.id) != exclude)
            .flat_map(|p| p.units.iter().map(|u| u.barcode.clone()))
            .filter(|barcode| !barcode.is_empty())
            .collect())
    }
}

fn apply_draft(row: &mut Product, draft: &ProductDraft) {
    row.name = draft.name.clone();
    row.barcode = draft.barcode.clone();
    row.cost_price = draft.cost_price;
    row.price = draft.price;
    row.stock = draft.stock;
    row.status = draft.status;
    row.low_stock_alert = draft.low_stock_alert;
    row.vat_percentage = draft.vat_percentage;
    row.vat_inclusive = draft.vat_inclusive;
    row.units = Json(draft.units.clone());
    row.multi_warehouse_distribution = Json(draft.multi_warehouse_distribution.clone());
    row.updated_at = Utc::now();
}

#[async_trait]
impl ProductCommandRepositoryTrait for InMemoryProducts {
    async fn create_product(&self, draft: &ProductDraft) -> Result<Product, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();

        if rows
            .iter()
            .any(|p| p.store_id == draft.store_id && p.barcode == draft.barcode)
        {
            return Err(RepositoryError::AlreadyExists(format!(
                "Barcode '{}' already exists in this store",
                draft.barcode
            )));
        }

        let mut created = product(&draft.store_id, &draft.barcode, Vec::new());
        apply_draft(&mut created, draft);
        rows.push(created.clone());

        Ok(created)
    }

    async fn update_product(&self, id: Uuid, draft: &ProductDraft) -> Result<Product, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|p| p.id == id && p.store_id == draft.store_id)
            .ok_or(RepositoryError::NotFound)?;

        apply_draft(row, draft);
        Ok(row.clone())
    }

    async fn delete_product(&self, store_id: &str, id: Uuid) -> Result<Product, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let index = rows
            .iter()
            .position(|p| p.id == id && p.store_id == store_id)
            .ok_or(RepositoryError::NotFound)?;

        Ok(rows.remove(index))
    }
}

pub fn store(id: &str, is_active: bool, end: Option<DateTime<Utc>>) -> Store {
    let now = Utc::now();
    Store {
        id: id.into(),
        name: format!("Store {id}"),
        is_active,
        subscription_start_date: Some(now - Duration::days(30)),
        subscription_end_date: end,
        created_at: now,
        updated_at: now,
    }
}

pub fn account(store_id: &str, due: f64, threshold: f64, paused: bool) -> StoreAccount {
    let now = Utc::now();
    StoreAccount {
        store_id: store_id.into(),
        total_earned: due,
        total_paid: 0.0,
        due_balance: due,
        threshold,
        is_paused: paused,
        paused_at: paused.then_some(now),
        paused_reason: paused.then(|| "Overdue balance".to_string()),
        last_payment_date: None,
        last_payment_amount: None,
        version: 0,
        created_at: now,
        updated_at: now,
    }
}

/// Stores and their accounts, with the account save writing the store flag
/// in the same critical section.
#[derive(Default)]
pub struct InMemoryStores {
    stores: Mutex<HashMap<String, Store>>,
    accounts: Mutex<HashMap<String, StoreAccount>>,
    conflicts: AtomicUsize,
    deactivations: AtomicUsize,
}

impl InMemoryStores {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn insert_store(&self, store: Store) {
        self.stores.lock().unwrap().insert(store.id.clone(), store);
    }

    pub fn insert_account(&self, account: StoreAccount) {
        self.accounts
            .lock()
            .unwrap()
            .insert(account.store_id.clone(), account);
    }

    pub fn store(&self, id: &str) -> Option<Store> {
        self.stores.lock().unwrap().get(id).cloned()
    }

    pub fn account(&self, store_id: &str) -> Option<StoreAccount> {
        self.accounts.lock().unwrap().get(store_id).cloned()
    }

    /// The next `n` saves lose their race.
    pub fn inject_conflicts(&self, n: usize) {
        self.conflicts.store(n, Ordering::SeqCst);
    }

    pub fn deactivations(&self) -> usize {
        self.deactivations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoreRepositoryTrait for InMemoryStores {
    async fn find_by_id(&self, id: &str) -> Result<Option<Store>, RepositoryError> {
        Ok(self.store(id))
    }

    async fn deactivate(&self, id: &str) -> Result<(), RepositoryError> {
        let mut stores = self.stores.lock().unwrap();
        let store = stores.get_mut(id).ok_or(RepositoryError::NotFound)?;
        store.is_active = false;
        self.deactivations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn reactivate(
        &self,
        id: &str,
        new_end_date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<Option<Store>, RepositoryError> {
        let mut stores = self.stores.lock().unwrap();
        let Some(store) = stores.get_mut(id) else {
            return Ok(None);
        };

        store.is_active = true;
        if let Some(end) = new_end_date {
            store.subscription_start_date = Some(now);
            store.subscription_end_date = Some(end);
        }

        Ok(Some(store.clone()))
    }

    async fn deactivate_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let mut count = 0;
        for store in self.stores.lock().unwrap().values_mut() {
            if store.is_active && store.is_expired_at(now) {
                store.is_active = false;
                count += 1;
            }
        }
        Ok(count)
    }
}

#[async_trait]
impl StoreAccountRepositoryTrait for InMemoryStores {
    async fn find_by_store_id(&self, store_id: &str) -> Result<Option<StoreAccount>, RepositoryError> {
        Ok(self.account(store_id))
    }

    async fn save(
        &self,
        account: &StoreAccount,
        expected_version: i64,
        store_active: Option<bool>,
    ) -> Result<StoreAccount, RepositoryError> {
        if self
            .conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(RepositoryError::Conflict(format!(
                "store account {} changed concurrently",
                account.store_id
            )));
        }

        let mut accounts = self.accounts.lock().unwrap();
        let current = accounts
            .get(&account.store_id)
            .ok_or(RepositoryError::NotFound)?;

        if current.version != expected_version {
            return Err(RepositoryError::Conflict(format!(
                "store account {} changed concurrently",
                account.store_id
            )));
        }

        if let Some(active) = store_active {
            let mut stores = self.stores.lock().unwrap();
            let store = stores
                .get_mut(&account.store_id)
                .ok_or(RepositoryError::NotFound)?;
            store.is_active = active;
        }

        let mut saved = account.clone();
        saved.version = expected_version + 1;
        saved.updated_at = Utc::now();
        accounts.insert(saved.store_id.clone(), saved.clone());

        Ok(saved)
    }
}

/// Store repository whose every call fails, for the fail-open paths.
pub struct BrokenStores;

#[async_trait]
impl StoreRepositoryTrait for BrokenStores {
    async fn find_by_id(&self, _id: &str) -> Result<Option<Store>, RepositoryError> {
        Err(RepositoryError::Custom("database unavailable".into()))
    }

    async fn deactivate(&self, _id: &str) -> Result<(), RepositoryError> {
        Err(RepositoryError::Custom("database unavailable".into()))
    }

    async fn reactivate(
        &self,
        _id: &str,
        _new_end_date: Option<DateTime<Utc>>,
        _now: DateTime<Utc>,
    ) -> Result<Option<Store>, RepositoryError> {
        Err(RepositoryError::Custom("database unavailable".into()))
    }

    async fn deactivate_expired(&self, _now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        Err(RepositoryError::Custom("database unavailable".into()))
    }
}

/// Cache backend that is always down.
pub struct UnreachableCache;

#[async_trait]
impl CacheBackendTrait for UnreachableCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::Timeout(250))
    }

    async fn set_with_ttl(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Timeout(250))
    }

    async fn del(&self, _key: &str) -> Result<(), CacheError> {
        Err(CacheError::Timeout(250))
    }

    async fn scan(&self, _cursor: u64, _pattern: &str) -> Result<(u64, Vec<String>), CacheError> {
        Err(CacheError::Timeout(250))
    }

    async fn del_many(&self, _keys: &[String]) -> Result<u64, CacheError> {
        Err(CacheError::Timeout(250))
    }
}

pub fn memory_cache() -> DynCacheBackend {
    Arc::new(MemoryCacheStore::new())
}

pub fn deps(
    products: Arc<InMemoryProducts>,
    stores: Arc<InMemoryStores>,
    cache: DynCacheBackend,
) -> DependenciesInjectDeps {
    DependenciesInjectDeps {
        product_query_repo: products.clone(),
        product_command_repo: products,
        store_repo: stores.clone(),
        store_account_repo: stores,
        cache,
        product_cache_ttl: Duration::hours(1),
    }
}

pub fn app_state(deps: DependenciesInjectDeps) -> AppState {
    AppState::from_deps(JWT_SECRET, deps)
}

pub fn access_token(user_id: &str, store_id: Option<&str>, role: &str) -> String {
    JwtConfig::new(JWT_SECRET)
        .generate_token(user_id, store_id, role, "access")
        .expect("token")
}
