// 请求处理器模块

pub mod browse;
pub mod download;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::filesystem::{FsError, FsErrorCode};

/// 错误响应
#[derive(Debug, Serialize)]
struct ErrorResponse {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

impl IntoResponse for FsError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.code {
            FsErrorCode::PathEscape => StatusCode::BAD_REQUEST,
            FsErrorCode::InvalidPathFormat => StatusCode::BAD_REQUEST,
            FsErrorCode::NotFound => StatusCode::NOT_FOUND,
            FsErrorCode::NotADirectory => StatusCode::BAD_REQUEST,
            FsErrorCode::NotAFile => StatusCode::BAD_REQUEST,
            FsErrorCode::DirectoryReadFailed => StatusCode::INTERNAL_SERVER_ERROR,
            FsErrorCode::WriteFailed => StatusCode::INTERNAL_SERVER_ERROR,
            FsErrorCode::MissingFileField => StatusCode::BAD_REQUEST,
            FsErrorCode::AccessDenied => StatusCode::FORBIDDEN,
        };

        let body = Json(ErrorResponse {
            code: self.code.code(),
            message: self.message,
            path: self.path,
        });

        (status, body).into_response()
    }
}
