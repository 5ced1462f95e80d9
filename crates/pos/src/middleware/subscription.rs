use crate::{abstract_trait::store::DynSubscriptionService, middleware::jwt::AuthUser};
use axum::{
    Extension,
    body::Body,
    http::Request,
    middleware::Next,
    response::IntoResponse,
};
use shared::errors::HttpError;
use tracing::warn;

/// Blocks non-admin callers whose store is inactive or past its subscription.
///
/// Runs after `auth_middleware`. If the check itself cannot be evaluated the
/// request goes through; only a definite inactive/expired answer blocks.
pub async fn subscription_middleware(
    Extension(subscription): Extension<DynSubscriptionService>,
    Extension(user): Extension<AuthUser>,
    req: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    if user.is_admin() {
        return Ok(next.run(req).await);
    }

    let Some(store_id) = user.store_id.as_deref() else {
        return Ok(next.run(req).await);
    };

    match subscription.check_subscription(store_id).await {
        Ok(status) if status.subscription_expired => {
            return Err(HttpError::SubscriptionExpired(
                "Your store subscription has expired. Please renew to continue.".to_string(),
            ));
        }
        Ok(status) if !status.is_active => {
            return Err(HttpError::SubscriptionExpired(
                "Your store is inactive. Please contact support to reactivate it.".to_string(),
            ));
        }
        Ok(_) => {}
        Err(e) => {
            warn!("⚠️ Subscription check for store {store_id} failed, letting request through: {e}");
        }
    }

    Ok(next.run(req).await)
}
