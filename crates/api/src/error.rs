//! API error types with HTTP response mapping.

use std::collections::BTreeMap;

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use domain::DomainError;
use reporting::ReportingError;
use thiserror::Error;

use crate::auth::LOGIN_URL;

/// Messages per input field, as returned in a 422 body.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Message for a required field left out of a request.
pub const REQUIRED_FIELD_MESSAGE: &str = "this field is required.";

/// API-level error type that maps to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found.
    #[error("{0}")]
    NotFound(String),
    /// Bad request from the client.
    #[error("{0}")]
    BadRequest(String),
    /// Missing or wrong bearer token.
    #[error("authentication required")]
    Unauthenticated,
    /// User-correctable input errors keyed by field.
    #[error("validation failed")]
    Validation(FieldErrors),
    /// Ledger error.
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// Reporting error.
    #[error(transparent)]
    Reporting(#[from] ReportingError),
    /// Internal server error.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// A single field error.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Validation(BTreeMap::from([(field.into(), vec![message.into()])]))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(msg) => error_body(StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => error_body(StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthenticated => {
                let body = serde_json::json!({
                    "error": "authentication required",
                    "login_url": LOGIN_URL,
                });
                (
                    StatusCode::UNAUTHORIZED,
                    [(header::WWW_AUTHENTICATE, "Bearer")],
                    axum::Json(body),
                )
                    .into_response()
            }
            ApiError::Validation(fields) => validation_body(fields),
            ApiError::Domain(err) => domain_error_to_response(err),
            ApiError::Reporting(err) => internal(err.to_string()),
            ApiError::Internal(msg) => internal(msg),
        }
    }
}

fn error_body(status: StatusCode, message: String) -> Response {
    let body = serde_json::json!({ "error": message });
    (status, axum::Json(body)).into_response()
}

fn validation_body(fields: FieldErrors) -> Response {
    let body = serde_json::json!({ "error": "validation failed", "fields": fields });
    (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(body)).into_response()
}

fn internal(message: String) -> Response {
    tracing::error!(error = %message, "internal server error");
    error_body(StatusCode::INTERNAL_SERVER_ERROR, message)
}

fn domain_error_to_response(err: DomainError) -> Response {
    if let Some(field) = err.field() {
        return validation_body(BTreeMap::from([(
            field.to_string(),
            vec![err.field_message()],
        )]));
    }
    match &err {
        DomainError::StockItemNotFound(_) | DomainError::SaleNotFound(_) => {
            error_body(StatusCode::NOT_FOUND, err.to_string())
        }
        _ => internal(err.to_string()),
    }
}
