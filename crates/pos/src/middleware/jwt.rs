use axum::{
    Extension,
    body::Body,
    http::{Request, header},
    middleware::Next,
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;
use shared::{
    abstract_trait::DynJwtService,
    errors::{HttpError, ServiceError},
};
use tracing::debug;

pub const ADMIN_ROLE: &str = "Admin";

/// Identity taken from a verified access token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub store_id: Option<String>,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }

    pub fn require_admin(&self) -> Result<(), HttpError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(HttpError::Forbidden(
                "Access denied. Required role: Admin".to_string(),
            ))
        }
    }

    /// Store the caller works in; product routes are meaningless without one.
    pub fn store_scope(&self) -> Result<&str, HttpError> {
        self.store_id.as_deref().ok_or_else(|| {
            HttpError::Forbidden("No store is associated with this account".to_string())
        })
    }

    /// Admins see every store, everyone else only their own.
    pub fn can_access_store(&self, store_id: &str) -> bool {
        self.is_admin()
            || self
                .store_id
                .as_deref()
                .is_some_and(|own| own.eq_ignore_ascii_case(store_id))
    }
}

pub async fn auth_middleware(
    cookie_jar: CookieJar,
    Extension(jwt): Extension<DynJwtService>,
    mut req: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    let token = cookie_jar
        .get("token")
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| auth_value.strip_prefix("Bearer ").map(str::to_owned))
        })
        .ok_or_else(|| {
            HttpError::Unauthorized("You are not logged in, please provide token".to_string())
        })?;

    let claims = jwt.verify_token(&token, "access").map_err(|e| {
        debug!("Rejected access token: {e}");
        match e {
            ServiceError::TokenExpired => HttpError::Unauthorized("Token expired".to_string()),
            _ => HttpError::Unauthorized("Invalid token".to_string()),
        }
    })?;

    req.extensions_mut().insert(AuthUser {
        user_id: claims.user_id,
        store_id: claims
            .store_id
            .filter(|id| !id.trim().is_empty())
            .map(|id| id.trim().to_lowercase()),
        role: claims.role,
    });

    Ok(next.run(req).await)
}
