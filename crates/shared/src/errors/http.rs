use crate::errors::{error::ErrorResponse, repository::RepositoryError, service::ServiceError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

pub const SUBSCRIPTION_EXPIRED_CODE: &str = "SUBSCRIPTION_EXPIRED";

#[derive(Debug)]
pub enum HttpError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    SubscriptionExpired(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl From<ServiceError> for HttpError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(errors) => {
                HttpError::BadRequest(format!("Validation failed: {}", errors.join("; ")))
            }

            ServiceError::NotFound(msg) => HttpError::NotFound(msg),

            ServiceError::Forbidden(msg) => HttpError::Forbidden(msg),

            ServiceError::SubscriptionExpired(msg) => HttpError::SubscriptionExpired(msg),

            ServiceError::Repo(repo_err) => match repo_err {
                RepositoryError::NotFound => HttpError::NotFound("Not found".into()),
                RepositoryError::Conflict(msg) => {
                    HttpError::Conflict(format!("{msg}. Please retry the request"))
                }
                RepositoryError::AlreadyExists(msg) => HttpError::Conflict(msg),
                other => {
                    error!("Repository failure surfaced to HTTP: {other}");
                    HttpError::Internal("Repository error".into())
                }
            },

            ServiceError::Jwt(err) => HttpError::Unauthorized(format!("JWT error: {err}")),

            ServiceError::TokenExpired => HttpError::Unauthorized("Token expired".into()),

            ServiceError::InvalidTokenType => HttpError::Unauthorized("Invalid token type".into()),

            ServiceError::Internal(msg) => HttpError::Internal(msg),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            HttpError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::fail(msg)),
            HttpError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, ErrorResponse::fail(msg)),
            HttpError::Forbidden(msg) => (StatusCode::FORBIDDEN, ErrorResponse::fail(msg)),
            HttpError::SubscriptionExpired(msg) => (
                StatusCode::FORBIDDEN,
                ErrorResponse::fail(msg).with_code(SUBSCRIPTION_EXPIRED_CODE),
            ),
            HttpError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse::fail(msg)),
            HttpError::Conflict(msg) => (StatusCode::CONFLICT, ErrorResponse::fail(msg)),
            HttpError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    status: "error".into(),
                    message: msg,
                    code: None,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}
