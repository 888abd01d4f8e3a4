//! Error-to-response mapping for API handlers
//!
//! Validation refusals carry the missing field names so the client can
//! enumerate them; store/internal failures deliberately return a generic
//! notice (details go to the log) and never destroy in-progress state.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tattfq_common::Error;
use tracing::error;

/// Wrapper turning the common error enum into an HTTP response
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message, missing) = match &self.0 {
            Error::Validation(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "incomplete",
                format!("Lengkapi dulu: {}", fields.join(", ")),
                Some(fields.clone()),
            ),
            Error::InvalidInput(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_input", msg.clone(), None)
            }
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone(), None),
            Error::Config(msg) => {
                error!("configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    "Internal error".to_string(),
                    None,
                )
            }
            Error::Database(e) => {
                error!("database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "store_failure",
                    "Operation failed; your answers are preserved".to_string(),
                    None,
                )
            }
            Error::Io(e) => {
                error!("io error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    "Internal error".to_string(),
                    None,
                )
            }
            Error::Internal(msg) => {
                error!("internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    "Internal error".to_string(),
                    None,
                )
            }
        };

        let body = match missing {
            Some(fields) => Json(json!({
                "error": kind,
                "message": message,
                "missing": fields,
            })),
            None => Json(json!({
                "error": kind,
                "message": message,
            })),
        };

        (status, body).into_response()
    }
}
