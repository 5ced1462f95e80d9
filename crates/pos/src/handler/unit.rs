use crate::{
    abstract_trait::store::DynSubscriptionService,
    domain::{
        requests::unit::CalculateUnitsRequest,
        response::{api::ApiResponse, unit::UnitBreakdown},
    },
    middleware::{
        jwt::auth_middleware, subscription::subscription_middleware,
        validate::SimpleValidatedJson,
    },
    state::AppState,
    unit_conversion::calculate_unit_chain,
};
use axum::{
    Extension, Json, http::StatusCode, middleware, response::IntoResponse, routing::post,
};
use shared::errors::{HttpError, ServiceError};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    post,
    path = "/api/units/calculate",
    tag = "Unit",
    security(("bearer_auth" = [])),
    request_body = CalculateUnitsRequest,
    responses(
        (status = 200, description = "Quantity and cost per unit", body = ApiResponse<Vec<UnitBreakdown>>),
        (status = 400, description = "Invalid chain")
    )
)]
pub async fn calculate_units(
    SimpleValidatedJson(body): SimpleValidatedJson<CalculateUnitsRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let breakdown =
        calculate_unit_chain(body.initial_quantity, body.total_purchase_price, &body.units)
            .map_err(ServiceError::from)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Units calculated", breakdown)),
    ))
}

pub fn unit_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let subscription: DynSubscriptionService = app_state.di_container.subscription.clone();

    OpenApiRouter::new()
        .route("/api/units/calculate", post(calculate_units))
        .route_layer(middleware::from_fn(subscription_middleware))
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(Extension(subscription))
        .layer(Extension(app_state.jwt_config.clone()))
}
