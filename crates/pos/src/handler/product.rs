use crate::{
    abstract_trait::product::service::{DynProductCommandService, DynProductQueryService},
    domain::{
        requests::{
            product::{
                CreateProductRequest, FindAllProducts, ImportProductsRequest, UpdateProductRequest,
            },
            unit::CreateMultiUnitProductRequest,
        },
        response::{
            api::{ApiResponse, ApiResponsePagination},
            product::{ImportProductsResponse, ProductResponse},
        },
    },
    middleware::{
        jwt::{AuthUser, auth_middleware},
        subscription::subscription_middleware,
        validate::SimpleValidatedJson,
    },
    state::AppState,
};
use axum::{
    Json,
    extract::{Extension, Path, Query},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use shared::errors::HttpError;
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Product",
    security(("bearer_auth" = [])),
    params(FindAllProducts),
    responses(
        (status = 200, description = "List of products", body = ApiResponsePagination<Vec<ProductResponse>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Subscription expired or no store"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_products(
    Extension(service): Extension<DynProductQueryService>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<FindAllProducts>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_all(user.store_scope()?, &params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/products/low-stock",
    tag = "Product",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Products at or below their alert level", body = ApiResponse<Vec<ProductResponse>>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_low_stock_products(
    Extension(service): Extension<DynProductQueryService>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_low_stock(user.store_scope()?).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Product",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product details", body = ApiResponse<ProductResponse>),
        (status = 404, description = "Product not found"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_product(
    Extension(service): Extension<DynProductQueryService>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_by_id(user.store_scope()?, id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/products/barcode/{barcode}",
    tag = "Product",
    security(("bearer_auth" = [])),
    params(("barcode" = String, Path, description = "Primary or unit barcode")),
    responses(
        (status = 200, description = "Active product carrying the barcode", body = ApiResponse<ProductResponse>),
        (status = 404, description = "No active product with this barcode"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn lookup_barcode(
    Extension(service): Extension<DynProductQueryService>,
    Extension(user): Extension<AuthUser>,
    Path(barcode): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.lookup_barcode(user.store_scope()?, &barcode).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Product",
    security(("bearer_auth" = [])),
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<ProductResponse>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Barcode already used in this store"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_product(
    Extension(service): Extension<DynProductCommandService>,
    Extension(user): Extension<AuthUser>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateProductRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.create_product(user.store_scope()?, &body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/products/multi-unit",
    tag = "Product",
    security(("bearer_auth" = [])),
    request_body = CreateMultiUnitProductRequest,
    responses(
        (status = 201, description = "Product created from a packaging chain", body = ApiResponse<ProductResponse>),
        (status = 400, description = "Invalid unit chain"),
        (status = 409, description = "Barcode already used in this store")
    )
)]
pub async fn create_multi_unit_product(
    Extension(service): Extension<DynProductCommandService>,
    Extension(user): Extension<AuthUser>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateMultiUnitProductRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service
        .create_multi_unit_product(user.store_scope()?, &body)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/products/import",
    tag = "Product",
    security(("bearer_auth" = [])),
    request_body = ImportProductsRequest,
    responses(
        (status = 200, description = "Import summary with per-row failures", body = ApiResponse<ImportProductsResponse>),
        (status = 400, description = "Empty or oversized batch")
    )
)]
pub async fn import_products(
    Extension(service): Extension<DynProductCommandService>,
    Extension(user): Extension<AuthUser>,
    SimpleValidatedJson(body): SimpleValidatedJson<ImportProductsRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.import_products(user.store_scope()?, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Product",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<ProductResponse>),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Barcode already used in this store")
    )
)]
pub async fn update_product(
    Extension(service): Extension<DynProductCommandService>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateProductRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service
        .update_product(user.store_scope()?, id, &body)
        .await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Product",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted", body = serde_json::Value),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product(
    Extension(service): Extension<DynProductCommandService>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    service.delete_product(user.store_scope()?, id).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "message": "Product deleted successfully"
        })),
    ))
}

pub fn product_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/products", get(get_products).post(create_product))
        .route("/api/products/low-stock", get(get_low_stock_products))
        .route("/api/products/multi-unit", post(create_multi_unit_product))
        .route("/api/products/import", post(import_products))
        .route("/api/products/barcode/{barcode}", get(lookup_barcode))
        .route(
            "/api/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route_layer(middleware::from_fn(subscription_middleware))
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(Extension(app_state.di_container.product_query.clone()))
        .layer(Extension(app_state.di_container.product_command.clone()))
        .layer(Extension(app_state.di_container.subscription.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
