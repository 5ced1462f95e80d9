use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use shared::errors::ServiceError;
use validator::Validate;

/// JSON body extractor that runs `validator` rules before the handler.
///
/// Failures answer 400 with one `path: message` entry per field, nested
/// paths included (`units[1].barcode: Barcode is required`).
pub struct SimpleValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for SimpleValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = (StatusCode, axum::Json<Value>);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(json_value) =
            axum::Json::<T>::from_request(req, state)
                .await
                .map_err(|rejection| {
                    let payload = json!({
                        "status": "fail",
                        "message": format!("Invalid JSON: {}", rejection.body_text()),
                    });
                    (rejection.status(), axum::Json(payload))
                })?;

        json_value.validate().map_err(|validation_errors| {
            let details = match ServiceError::from(validation_errors) {
                ServiceError::Validation(details) => details,
                other => vec![other.to_string()],
            };
            let payload = json!({
                "status": "fail",
                "message": format!("Validation failed: {}", details.join("; ")),
                "details": details,
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload))
        })?;

        Ok(Self(json_value))
    }
}
