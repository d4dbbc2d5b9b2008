//! 统一的 API 错误类型与转换。

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json as JsonResponse, Response};
use serde::Serialize;

use crate::drive::DriveError;

pub const FILE_TOO_LARGE: &str = "File too large";

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    PayloadTooLarge(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    success: Option<bool>,
    error: &'a str,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::PayloadTooLarge(msg)
            | ApiError::Internal(msg) => msg,
        }
    }

    fn render(&self, success: Option<bool>) -> Response {
        let body = ErrorBody {
            success,
            error: self.message(),
        };
        (self.status(), JsonResponse(body)).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.render(None)
    }
}

/// 带 `"success": false` 字段的错误响应。
#[derive(Debug)]
pub struct FlaggedError(pub ApiError);

impl From<ApiError> for FlaggedError {
    fn from(error: ApiError) -> Self {
        FlaggedError(error)
    }
}

impl IntoResponse for FlaggedError {
    fn into_response(self) -> Response {
        self.0.render(Some(false))
    }
}

impl From<DriveError> for ApiError {
    fn from(error: DriveError) -> Self {
        ApiError::Internal(error.to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(error: MultipartError) -> Self {
        match error.status() {
            StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge(FILE_TOO_LARGE.into()),
            _ => ApiError::BadRequest(error.body_text()),
        }
    }
}
