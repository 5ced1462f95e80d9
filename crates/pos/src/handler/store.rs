use crate::{
    abstract_trait::store::DynSubscriptionService,
    domain::{
        requests::store::ReactivateStoreRequest,
        response::{
            api::ApiResponse,
            store::{StoreResponse, SubscriptionStatusResponse, SweepResponse},
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
    routing::{get, post},
};
use shared::errors::HttpError;
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/stores/{store_id}/subscription",
    tag = "Store",
    security(("bearer_auth" = [])),
    params(("store_id" = String, Path, description = "Store ID")),
    responses(
        (status = 200, description = "Subscription state of the store", body = ApiResponse<SubscriptionStatusResponse>),
        (status = 403, description = "Not an admin of this store"),
        (status = 404, description = "Store not found")
    )
)]
pub async fn get_subscription(
    Extension(service): Extension<DynSubscriptionService>,
    Extension(user): Extension<AuthUser>,
    Path(store_id): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    if !user.can_access_store(&store_id) {
        return Err(HttpError::Forbidden(
            "You can only view your own store".to_string(),
        ));
    }

    let status = service.check_subscription(&store_id).await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            "Subscription retrieved successfully",
            status,
        )),
    ))
}

#[utoipa::path(
    post,
    path = "/api/admin/stores/{store_id}/reactivate",
    tag = "Store",
    security(("bearer_auth" = [])),
    params(("store_id" = String, Path, description = "Store ID")),
    request_body = ReactivateStoreRequest,
    responses(
        (status = 200, description = "Store reactivated", body = ApiResponse<StoreResponse>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Store not found")
    )
)]
pub async fn reactivate_store(
    Extension(service): Extension<DynSubscriptionService>,
    Extension(user): Extension<AuthUser>,
    Path(store_id): Path<String>,
    SimpleValidatedJson(body): SimpleValidatedJson<ReactivateStoreRequest>,
) -> Result<impl IntoResponse, HttpError> {
    user.require_admin()?;

    let response = service
        .reactivate(&store_id, body.subscription_end_date)
        .await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/admin/stores/sweep-expired",
    tag = "Store",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Number of stores deactivated", body = ApiResponse<SweepResponse>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn sweep_expired(
    Extension(service): Extension<DynSubscriptionService>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, HttpError> {
    user.require_admin()?;

    let deactivated = service.sweep_expired().await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            "Expired subscriptions swept",
            SweepResponse { deactivated },
        )),
    ))
}

pub fn store_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/stores/{store_id}/subscription", get(get_subscription))
        .route("/api/admin/stores/sweep-expired", post(sweep_expired))
        .route(
            "/api/admin/stores/{store_id}/reactivate",
            post(reactivate_store),
        )
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(Extension(app_state.di_container.subscription.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
