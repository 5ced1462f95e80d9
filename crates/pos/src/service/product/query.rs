use crate::{
    abstract_trait::product::{
        repository::DynProductQueryRepository, service::ProductQueryServiceTrait,
    },
    domain::{
        requests::product::FindAllProducts,
        response::{
            api::{ApiResponse, ApiResponsePagination},
            pagination::Pagination,
            product::ProductResponse,
        },
    },
    service::barcode_cache::BarcodeCache,
};
use async_trait::async_trait;
use prometheus_client::registry::Registry;
use shared::{
    errors::ServiceError,
    utils::{Metrics, Status},
};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Clone)]
pub struct ProductQueryService {
    pub query: DynProductQueryRepository,
    pub barcode_cache: Arc<BarcodeCache>,
    pub metrics: Metrics,
}

impl ProductQueryService {
    pub fn new(
        query: DynProductQueryRepository,
        barcode_cache: Arc<BarcodeCache>,
        registry: &mut Registry,
    ) -> Self {
        let metrics = Metrics::new();
        metrics.register("product_query_service", registry);

        Self {
            query,
            barcode_cache,
            metrics,
        }
    }

    fn complete_success(&self, operation: &str, start: Instant, message: &str) {
        info!("✅ {message}");
        self.metrics
            .record(operation, Status::Success, start.elapsed().as_secs_f64());
    }

    fn complete_error(&self, operation: &str, start: Instant, message: &str) {
        error!("❌ {message}");
        self.metrics
            .record(operation, Status::Error, start.elapsed().as_secs_f64());
    }
}

#[async_trait]
impl ProductQueryServiceTrait for ProductQueryService {
    async fn find_all(
        &self,
        store_id: &str,
        req: &FindAllProducts,
    ) -> Result<ApiResponsePagination<Vec<ProductResponse>>, ServiceError> {
        let start = Instant::now();

        let page = if req.page > 0 { req.page } else { 1 };
        let page_size = if req.page_size > 0 {
            req.page_size.min(100)
        } else {
            10
        };
        let req = FindAllProducts {
            page,
            page_size,
            search: req.search.clone(),
        };

        let (products, total) = match self.query.find_all(store_id, &req).await {
            Ok(res) => res,
            Err(e) => {
                self.complete_error("find_all", start, &format!("Failed to fetch products: {e}"));
                return Err(ServiceError::Repo(e));
            }
        };

        let data: Vec<ProductResponse> = products.into_iter().map(ProductResponse::from).collect();

        self.complete_success(
            "find_all",
            start,
            &format!("Found {} products (total: {total})", data.len()),
        );

        Ok(ApiResponsePagination {
            status: "success".to_string(),
            message: "Products retrieved successfully".to_string(),
            data,
            pagination: Pagination::new(page, page_size, total),
        })
    }

    async fn find_by_id(
        &self,
        store_id: &str,
        id: Uuid,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        let start = Instant::now();

        match self.query.find_by_id(store_id, id).await {
            Ok(Some(product)) => {
                self.complete_success("find_by_id", start, &format!("Found product {id}"));
                Ok(ApiResponse::success(
                    "Product retrieved successfully",
                    ProductResponse::from(product),
                ))
            }
            Ok(None) => {
                self.complete_error("find_by_id", start, &format!("Product {id} not found"));
                Err(ServiceError::NotFound(format!("Product {id} not found")))
            }
            Err(e) => {
                self.complete_error("find_by_id", start, &format!("Failed to fetch {id}: {e}"));
                Err(ServiceError::Repo(e))
            }
        }
    }

    async fn lookup_barcode(
        &self,
        store_id: &str,
        barcode: &str,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        let start = Instant::now();

        match self.barcode_cache.lookup(store_id, barcode).await {
            Ok(Some(product)) => {
                self.complete_success("lookup_barcode", start, &format!("Resolved {barcode}"));
                Ok(ApiResponse::success(
                    "Product retrieved successfully",
                    ProductResponse::from(product),
                ))
            }
            Ok(None) => {
                self.metrics.record(
                    "lookup_barcode",
                    Status::Success,
                    start.elapsed().as_secs_f64(),
                );
                Err(ServiceError::NotFound(format!(
                    "No active product with barcode '{}'",
                    barcode.trim()
                )))
            }
            Err(e) => {
                self.complete_error(
                    "lookup_barcode",
                    start,
                    &format!("Barcode lookup failed for {barcode}: {e}"),
                );
                Err(ServiceError::Repo(e))
            }
        }
    }

    async fn find_low_stock(
        &self,
        store_id: &str,
    ) -> Result<ApiResponse<Vec<ProductResponse>>, ServiceError> {
        let start = Instant::now();

        let products = match self.query.find_low_stock(store_id).await {
            Ok(products) => products,
            Err(e) => {
                self.complete_error("find_low_stock", start, &format!("{e}"));
                return Err(ServiceError::Repo(e));
            }
        };

        self.complete_success(
            "find_low_stock",
            start,
            &format!("{} products at or below their alert level", products.len()),
        );

        Ok(ApiResponse::success(
            "Low stock products retrieved successfully",
            products.into_iter().map(ProductResponse::from).collect(),
        ))
    }
}
