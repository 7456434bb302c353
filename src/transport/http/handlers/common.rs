use crate::domain::error::{ErrorKind, StoreError};
use crate::domain::seller::AccountId;
use crate::transport::http::types::ApiResponse;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Header carrying the authenticated operator's account number.
pub const ACCOUNT_HEADER: &str = "x-account-no";

pub type ErrorResponse = (StatusCode, Json<ApiResponse>);

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation | ErrorKind::ReferenceNotFound => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::ConcurrentModification => StatusCode::CONFLICT,
        ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_response(err: StoreError) -> ErrorResponse {
    let status = status_for(err.kind());
    if status.is_server_error() {
        tracing::error!(error = %err, "Request failed");
    }
    (status, Json(ApiResponse::failure(err.to_string())))
}

pub fn bad_request(message: impl Into<String>) -> ErrorResponse {
    (StatusCode::BAD_REQUEST, Json(ApiResponse::failure(message)))
}

pub fn unprocessable(message: impl Into<String>) -> ErrorResponse {
    (StatusCode::UNPROCESSABLE_ENTITY, Json(ApiResponse::failure(message)))
}

/// Wraps `data` in a successful envelope with `status`.
pub fn ok_response<T: Serialize>(status: StatusCode, data: &T) -> Response {
    match serde_json::to_value(data) {
        Ok(value) => (status, Json(ApiResponse::ok(value))).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::failure(format!("Failed to encode response: {}", e))),
        )
            .into_response(),
    }
}

/// The operator performing a write, taken from the `x-account-no` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActingAccount(pub AccountId);

impl ActingAccount {
    pub fn parse(raw: Option<&str>) -> Result<Self, String> {
        let raw = raw.ok_or_else(|| format!("Missing {} header", ACCOUNT_HEADER))?;
        match raw.trim().parse::<AccountId>() {
            Ok(no) if no > 0 => Ok(ActingAccount(no)),
            _ => Err(format!("Invalid {} header: '{}'", ACCOUNT_HEADER, raw)),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ActingAccount
where
    S: Send + Sync,
{
    type Rejection = ErrorResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = match parts.headers.get(ACCOUNT_HEADER) {
            Some(value) => Some(
                value
                    .to_str()
                    .map_err(|_| bad_request(format!("Invalid {} header", ACCOUNT_HEADER)))?,
            ),
            None => None,
        };
        ActingAccount::parse(raw).map_err(bad_request)
    }
}
