// 文件下载处理器

use axum::{
    body::Body,
    extract::{Path, State},
    http::header,
    response::Response,
};
use tokio_util::io::ReaderStream;
use tracing::info;

use crate::filesystem::{FsError, FsErrorCode};
use crate::server::state::AppState;

/// GET /download 与 GET /download/
/// 未指定文件时直接返回 400
pub async fn missing_path() -> FsError {
    FsError::new(FsErrorCode::InvalidPathFormat).with_message("未指定文件")
}

/// GET /download/*path
/// 以附件形式流式下载单个文件
///
/// 文件内容从磁盘直接流向响应，不在内存中整体缓冲
pub async fn download(
    State(state): State<AppState>,
    Path(raw_path): Path<String>,
) -> Result<Response, FsError> {
    let relative = state.resolver.normalize(&raw_path)?;
    if relative.is_empty() {
        return Err(FsError::new(FsErrorCode::InvalidPathFormat).with_message("未指定文件"));
    }

    let full_path = state.resolver.resolve(&relative)?;

    let metadata = tokio::fs::metadata(&full_path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            FsError::new(FsErrorCode::NotFound).with_path(relative.clone())
        } else {
            FsError::new(FsErrorCode::DirectoryReadFailed)
                .with_path(relative.clone())
                .with_message(format!("访问文件失败: {}", e))
        }
    })?;

    if metadata.is_dir() {
        return Err(FsError::new(FsErrorCode::NotAFile).with_path(relative));
    }

    let file = tokio::fs::File::open(&full_path).await.map_err(|e| {
        FsError::new(FsErrorCode::DirectoryReadFailed)
            .with_path(relative.clone())
            .with_message(format!("打开文件失败: {}", e))
    })?;

    let basename = full_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| relative.clone());

    let body = Body::from_stream(ReaderStream::new(file));
    let response = Response::builder()
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", basename),
        )
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_LENGTH, metadata.len())
        .body(body)
        .map_err(|e| {
            FsError::new(FsErrorCode::DirectoryReadFailed)
                .with_message(format!("构建响应失败: {}", e))
        })?;

    info!("文件下载: {} ({} 字节)", relative, metadata.len());
    Ok(response)
}
