use crate::{
    abstract_trait::store_account::DynStoreAccountService,
    domain::{
        requests::store_account::{RecordPaymentRequest, SetPausedRequest, UpdateThresholdRequest},
        response::{
            api::ApiResponse,
            store_account::{PaymentResponse, StoreAccountResponse},
        },
    },
    middleware::{
        jwt::{AuthUser, auth_middleware},
        validate::SimpleValidatedJson,
    },
    state::AppState,
};
use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use shared::errors::HttpError;
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/admin/store-accounts/{store_id}",
    tag = "Store Account",
    security(("bearer_auth" = [])),
    params(("store_id" = String, Path, description = "Store ID")),
    responses(
        (status = 200, description = "Billing state of the store", body = ApiResponse<StoreAccountResponse>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "No account for this store")
    )
)]
pub async fn get_store_account(
    Extension(service): Extension<DynStoreAccountService>,
    Extension(user): Extension<AuthUser>,
    Path(store_id): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    user.require_admin()?;

    let response = service.get_account(&store_id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/admin/store-accounts/{store_id}/payments",
    tag = "Store Account",
    security(("bearer_auth" = [])),
    params(("store_id" = String, Path, description = "Store ID")),
    request_body = RecordPaymentRequest,
    responses(
        (status = 200, description = "Payment applied", body = ApiResponse<PaymentResponse>),
        (status = 400, description = "Amount must be positive"),
        (status = 404, description = "No account for this store"),
        (status = 409, description = "Concurrent update, retry")
    )
)]
pub async fn record_payment(
    Extension(service): Extension<DynStoreAccountService>,
    Extension(user): Extension<AuthUser>,
    Path(store_id): Path<String>,
    SimpleValidatedJson(body): SimpleValidatedJson<RecordPaymentRequest>,
) -> Result<impl IntoResponse, HttpError> {
    user.require_admin()?;

    let response = service.record_payment(&store_id, body.amount).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/admin/store-accounts/{store_id}/threshold",
    tag = "Store Account",
    security(("bearer_auth" = [])),
    params(("store_id" = String, Path, description = "Store ID")),
    request_body = UpdateThresholdRequest,
    responses(
        (status = 200, description = "Threshold updated", body = ApiResponse<StoreAccountResponse>),
        (status = 404, description = "No account for this store"),
        (status = 409, description = "Concurrent update, retry")
    )
)]
pub async fn update_threshold(
    Extension(service): Extension<DynStoreAccountService>,
    Extension(user): Extension<AuthUser>,
    Path(store_id): Path<String>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateThresholdRequest>,
) -> Result<impl IntoResponse, HttpError> {
    user.require_admin()?;

    let response = service.update_threshold(&store_id, body.threshold).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/admin/store-accounts/{store_id}/pause",
    tag = "Store Account",
    security(("bearer_auth" = [])),
    params(("store_id" = String, Path, description = "Store ID")),
    request_body = SetPausedRequest,
    responses(
        (status = 200, description = "Store paused or unpaused", body = ApiResponse<StoreAccountResponse>),
        (status = 404, description = "No account for this store"),
        (status = 409, description = "Concurrent update, retry")
    )
)]
pub async fn set_paused(
    Extension(service): Extension<DynStoreAccountService>,
    Extension(user): Extension<AuthUser>,
    Path(store_id): Path<String>,
    SimpleValidatedJson(body): SimpleValidatedJson<SetPausedRequest>,
) -> Result<impl IntoResponse, HttpError> {
    user.require_admin()?;

    let response = service
        .set_paused(&store_id, body.is_paused, body.reason.as_deref())
        .await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn store_account_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/admin/store-accounts/{store_id}", get(get_store_account))
        .route(
            "/api/admin/store-accounts/{store_id}/payments",
            post(record_payment),
        )
        .route(
            "/api/admin/store-accounts/{store_id}/threshold",
            put(update_threshold),
        )
        .route("/api/admin/store-accounts/{store_id}/pause", put(set_paused))
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(Extension(app_state.di_container.store_account.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
