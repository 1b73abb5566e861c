//! HTTP error responses
//!
//! Operation errors become status codes only here. Read operations report
//! `{error, code, details}`; inserts report `{error}`; malformed bodies get a
//! 4xx with `{error, details}`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use docbridge_common::BridgeError;
use serde_json::json;

/// Body layout used for a failed operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStyle {
    /// `{error, code, details}`
    Detailed,
    /// `{error}`
    Plain,
}

#[derive(Debug)]
pub enum ApiError {
    /// The body could not be read as the operation's payload
    BadRequest { status: StatusCode, details: String },
    /// The connection or driver call failed
    Operation { error: BridgeError, style: ErrorStyle },
}

impl ApiError {
    pub fn detailed(error: BridgeError) -> Self {
        ApiError::Operation {
            error,
            style: ErrorStyle::Detailed,
        }
    }

    pub fn plain(error: BridgeError) -> Self {
        ApiError::Operation {
            error,
            style: ErrorStyle::Plain,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { status, .. } => *status,
            ApiError::Operation { error, .. } if error.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Operation { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match &rejection {
            JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            JsonRejection::BytesRejection(_) => rejection.status(),
            _ => StatusCode::BAD_REQUEST,
        };
        ApiError::BadRequest {
            status,
            details: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ApiError::BadRequest { details, .. } => json!({
                "error": "Invalid request body",
                "details": details,
            }),
            ApiError::Operation { error, .. } if error.is_client_error() => json!({
                "error": error.message(),
                "details": error.to_string(),
            }),
            ApiError::Operation {
                error,
                style: ErrorStyle::Detailed,
            } => json!({
                "error": error.message(),
                "code": error.code(),
                "details": error.to_string(),
            }),
            ApiError::Operation {
                error,
                style: ErrorStyle::Plain,
            } => json!({ "error": error.message() }),
        };
        (status, Json(body)).into_response()
    }
}
