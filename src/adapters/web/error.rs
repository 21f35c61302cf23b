//! HTTP error responses for the web adapter.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::domain::error::QuantError;

pub const INTERNAL_MESSAGE: &str = "Internal Server Error";

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

pub fn status_from_error(err: &QuantError) -> StatusCode {
    match err {
        QuantError::InvalidSeries { .. }
        | QuantError::ConfigParse { .. }
        | QuantError::ConfigMissing { .. }
        | QuantError::ConfigInvalid { .. } => StatusCode::BAD_REQUEST,
        QuantError::NoData { .. } => StatusCode::NOT_FOUND,
        QuantError::Provider { .. } | QuantError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<QuantError> for WebError {
    fn from(err: QuantError) -> Self {
        Self::new(status_from_error(&err), err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        // server-side detail stays in the log
        let message = if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.message, "request failed");
            INTERNAL_MESSAGE.to_string()
        } else {
            self.message
        };
        (self.status, Json(json!({ "error": message }))).into_response()
    }
}
