//! HTTP Error Handling
//!
//! 错误响应只携带简短的 `{"error": ...}`，存储细节只进日志

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::ApplicationError;

/// 错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// 错误消息
pub mod message {
    pub const NOT_FOUND: &str = "Not found";
    pub const MISSING_ID: &str = "Not Found";
    pub const INVALID_DATA: &str = "Invalid data";
    pub const CONFLICT: &str = "Revision conflict";
    pub const INTERNAL: &str = "Could not service request";
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    InvalidData(String),
    /// 请求体缺失或无法解析，返回空的 400
    MissingBody(String),
    Conflict(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound(msg) => {
                tracing::warn!(error = %msg, "Resource not found");
                (StatusCode::NOT_FOUND, msg.clone())
            }
            ApiError::InvalidData(msg) => {
                tracing::warn!(error = %msg, "Invalid data");
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            ApiError::MissingBody(reason) => {
                tracing::error!(reason = %reason, "No usable body found in request");
                return StatusCode::BAD_REQUEST.into_response();
            }
            ApiError::Conflict(id) => {
                tracing::warn!(id = %id, "Revision conflict");
                (StatusCode::CONFLICT, message::CONFLICT.to_string())
            }
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, message::INTERNAL.to_string())
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::NotFound(_) => ApiError::NotFound(message::NOT_FOUND.to_string()),
            ApplicationError::Invalid(reason) => ApiError::InvalidData(reason),
            ApplicationError::Conflict(id) => ApiError::Conflict(id),
            ApplicationError::Unknown(detail) => ApiError::Internal(detail),
        }
    }
}
