use crate::{
    abstract_trait::product::{
        repository::{DynProductCommandRepository, DynProductQueryRepository},
        service::ProductCommandServiceTrait,
    },
    domain::{
        requests::{
            product::{CreateProductRequest, ImportProductsRequest, UpdateProductRequest},
            unit::CreateMultiUnitProductRequest,
        },
        response::{
            api::ApiResponse,
            product::{ImportFailure, ImportProductsResponse, ProductResponse},
        },
    },
    model::{Product as ProductModel, ProductDraft, ProductStatus, ProductUnit},
    service::barcode_cache::BarcodeCache,
    unit_conversion::{base_conversion_factors, calculate_unit_chain, validate_unit_chain},
};
use async_trait::async_trait;
use prometheus_client::registry::Registry;
use shared::{
    errors::{RepositoryError, ServiceError},
    utils::{Metrics, Status},
};
use std::{collections::HashSet, sync::Arc};
use tokio::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

#[derive(Clone)]
pub struct ProductCommandService {
    pub command: DynProductCommandRepository,
    pub query: DynProductQueryRepository,
    pub barcode_cache: Arc<BarcodeCache>,
    pub metrics: Metrics,
}

impl ProductCommandService {
    pub fn new(
        command: DynProductCommandRepository,
        query: DynProductQueryRepository,
        barcode_cache: Arc<BarcodeCache>,
        registry: &mut Registry,
    ) -> Self {
        let metrics = Metrics::new();
        metrics.register("product_command_service", registry);

        Self {
            command,
            query,
            barcode_cache,
            metrics,
        }
    }

    fn complete<T>(&self, operation: &str, start: Instant, result: &Result<T, ServiceError>) {
        let status = match result {
            Ok(_) => {
                info!("✅ {operation} completed");
                Status::Success
            }
            Err(e) => {
                error!("❌ {operation} failed: {e}");
                Status::Error
            }
        };
        self.metrics
            .record(operation, status, start.elapsed().as_secs_f64());
    }

    /// The primary barcode must not be another product's unit barcode. Unit
    /// barcodes must be distinct, differ from the primary barcode and be
    /// unused by every other product of the store.
    async fn check_unit_barcodes(
        &self,
        draft: &ProductDraft,
        exclude: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        let mut errors = Vec::new();

        let unit_barcodes = self
            .query
            .find_unit_barcodes(&draft.store_id, exclude)
            .await?;
        if unit_barcodes.contains(&draft.barcode) {
            errors.push(format!(
                "barcode: Barcode '{}' already belongs to another product's unit",
                draft.barcode
            ));
        }

        let known: HashSet<String> = if draft.units.is_empty() {
            HashSet::new()
        } else {
            self.query
                .find_known_barcodes(&draft.store_id, exclude)
                .await?
                .into_iter()
                .collect()
        };

        let mut seen = HashSet::from([draft.barcode.clone()]);

        for (index, unit) in draft.units.iter().enumerate() {
            if unit.barcode.is_empty() {
                errors.push(format!("units[{index}].barcode: Barcode is required"));
            } else if !seen.insert(unit.barcode.clone()) {
                errors.push(format!(
                    "units[{index}].barcode: Barcode '{}' is already used by this product",
                    unit.barcode
                ));
            } else if known.contains(&unit.barcode) {
                errors.push(format!(
                    "units[{index}].barcode: Barcode '{}' already belongs to a product",
                    unit.barcode
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(errors))
        }
    }

    async fn insert(
        &self,
        store_id: &str,
        req: &CreateProductRequest,
    ) -> Result<ProductModel, ServiceError> {
        req.validate()?;

        let draft = req.clone().into_draft(store_id);
        self.check_unit_barcodes(&draft, None).await?;

        Ok(self.command.create_product(&draft).await?)
    }

    async fn build_multi_unit(
        &self,
        store_id: &str,
        req: &CreateMultiUnitProductRequest,
    ) -> Result<ProductModel, ServiceError> {
        req.validate()?;

        let store_id = store_id.to_lowercase();
        let known: HashSet<String> = self
            .query
            .find_known_barcodes(&store_id, None)
            .await?
            .into_iter()
            .collect();

        let errors = validate_unit_chain(&req.units, &known);
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }

        let breakdown =
            calculate_unit_chain(req.initial_quantity, req.total_purchase_price, &req.units)?;
        let factors = base_conversion_factors(&req.units);

        let lowest_index = req.units.len() - 1;
        let lowest = &req.units[lowest_index];
        let lowest_totals = &breakdown[lowest_index];

        let stock = lowest_totals.total_quantity.floor();
        if stock > f64::from(i32::MAX) {
            return Err(ServiceError::Validation(vec![format!(
                "initial_quantity: {stock} {} exceeds the stock limit",
                lowest.unit_name.trim()
            )]));
        }

        let units = req.units[..lowest_index]
            .iter()
            .zip(&factors)
            .map(|(unit, factor)| ProductUnit {
                unit_name: unit.unit_name.trim().to_string(),
                barcode: unit.barcode.trim().to_string(),
                selling_price: unit.selling_price,
                conversion_factor: *factor,
            })
            .collect();

        let draft = ProductDraft {
            store_id,
            name: req.name.trim().to_string(),
            barcode: lowest.barcode.trim().to_string(),
            cost_price: lowest_totals.cost_per_unit,
            price: lowest.selling_price,
            stock: stock as i32,
            status: ProductStatus::Active,
            low_stock_alert: req.low_stock_alert,
            vat_percentage: req.vat_percentage,
            vat_inclusive: req.vat_inclusive,
            units,
            multi_warehouse_distribution: Vec::new(),
        };

        Ok(self.command.create_product(&draft).await?)
    }

    /// Returns the product before and after the update.
    async fn apply_update(
        &self,
        store_id: &str,
        id: Uuid,
        req: &UpdateProductRequest,
    ) -> Result<(ProductModel, ProductModel), ServiceError> {
        req.validate()?;

        let draft = req.clone().into_draft(store_id);
        let previous = self
            .query
            .find_by_id(&draft.store_id, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {id} not found")))?;

        self.check_unit_barcodes(&draft, Some(id)).await?;

        let updated = match self.command.update_product(id, &draft).await {
            Err(RepositoryError::NotFound) => {
                return Err(ServiceError::NotFound(format!("Product {id} not found")));
            }
            other => other?,
        };

        Ok((previous, updated))
    }
}

#[async_trait]
impl ProductCommandServiceTrait for ProductCommandService {
    async fn create_product(
        &self,
        store_id: &str,
        req: &CreateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        let start = Instant::now();
        info!("🆕 Creating product {} in store {store_id}", req.barcode);

        let result = self.insert(store_id, req).await;
        self.complete("create_product", start, &result);

        let product = result?;
        self.barcode_cache
            .invalidate_all_barcodes(&product.store_id, &product)
            .await;

        Ok(ApiResponse::success(
            "Product created successfully",
            ProductResponse::from(product),
        ))
    }

    async fn create_multi_unit_product(
        &self,
        store_id: &str,
        req: &CreateMultiUnitProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        let start = Instant::now();

        let result = self.build_multi_unit(store_id, req).await;

        self.complete("create_multi_unit_product", start, &result);

        let product = result?;
        self.barcode_cache
            .invalidate_all_barcodes(&product.store_id, &product)
            .await;

        Ok(ApiResponse::success(
            "Multi-unit product created successfully",
            ProductResponse::from(product),
        ))
    }

    async fn update_product(
        &self,
        store_id: &str,
        id: Uuid,
        req: &UpdateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        let start = Instant::now();
        info!("🔄 Updating product {id} in store {store_id}");

        let result = self.apply_update(store_id, id, req).await;

        self.complete("update_product", start, &result);

        let (previous, updated) = result?;
        self.barcode_cache
            .invalidate_all_barcodes(&previous.store_id, &previous)
            .await;
        self.barcode_cache
            .invalidate_all_barcodes(&updated.store_id, &updated)
            .await;

        Ok(ApiResponse::success(
            "Product updated successfully",
            ProductResponse::from(updated),
        ))
    }

    async fn delete_product(&self, store_id: &str, id: Uuid) -> Result<(), ServiceError> {
        let start = Instant::now();
        let store_id = store_id.to_lowercase();

        let result = match self.command.delete_product(&store_id, id).await {
            Ok(product) => Ok(product),
            Err(RepositoryError::NotFound) => {
                Err(ServiceError::NotFound(format!("Product {id} not found")))
            }
            Err(e) => Err(ServiceError::Repo(e)),
        };

        self.complete("delete_product", start, &result);

        let deleted = result?;
        self.barcode_cache
            .invalidate_all_barcodes(&store_id, &deleted)
            .await;

        Ok(())
    }

    async fn import_products(
        &self,
        store_id: &str,
        req: &ImportProductsRequest,
    ) -> Result<ApiResponse<ImportProductsResponse>, ServiceError> {
        let start = Instant::now();

        let validated = req.validate().map_err(ServiceError::from);
        if validated.is_err() {
            self.complete("import_products", start, &validated);
        }
        validated?;

        info!(
            "📦 Importing {} products into store {store_id}",
            req.products.len()
        );

        let mut created = 0;
        let mut failed = Vec::new();

        for (row, product) in req.products.iter().enumerate() {
            match self.insert(store_id, product).await {
                Ok(_) => created += 1,
                Err(e) => {
                    warn!("⚠️ Import row {row} ({}) rejected: {e}", product.barcode);
                    failed.push(ImportFailure {
                        row,
                        barcode: product.barcode.trim().to_string(),
                        error: import_error_message(e),
                    });
                }
            }
        }

        self.barcode_cache.invalidate_store(store_id).await;

        self.metrics.record(
            "import_products",
            Status::Success,
            start.elapsed().as_secs_f64(),
        );
        info!(
            "✅ Import into {store_id} finished: {created} created, {} failed",
            failed.len()
        );

        Ok(ApiResponse::success(
            "Products imported",
            ImportProductsResponse { created, failed },
        ))
    }
}

fn import_error_message(err: ServiceError) -> String {
    match err {
        ServiceError::Validation(errors) => errors.join("; "),
        ServiceError::Repo(RepositoryError::AlreadyExists(msg)) => msg,
        ServiceError::Repo(_) => "Failed to save product".to_string(),
        other => other.to_string(),
    }
}
