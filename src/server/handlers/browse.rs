// 目录浏览与上传处理器

use std::path::Path;

use axum::{
    extract::{Multipart, Query, State},
    response::{Html, Redirect},
};
use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::filesystem::{breadcrumbs, FsError, FsErrorCode};
use crate::server::render;
use crate::server::state::AppState;

/// 浏览请求参数
#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    /// 相对路径（空 = 根目录）
    #[serde(default)]
    pub path: String,
}

/// GET /?path=<relativePath>
/// 渲染目录列表页面
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> Result<Html<String>, FsError> {
    let relative = state.resolver.normalize(&query.path)?;
    let nodes = state.lister.list(&relative, state.config.serve.max_depth)?;
    let crumbs = breadcrumbs(&relative);

    Ok(Html(render::render_page(&relative, &crumbs, &nodes)))
}

/// POST /
/// multipart 表单上传单个文件到 `path` 字段指定的目录
///
/// 字段按到达顺序流式消费，`path` 字段需先于 `file` 字段
/// （页面表单保证该顺序）；`file` 之后到达的 `path` 字段被忽略，
/// 重定向目标始终与文件实际落盘目录一致。请求体分块直写磁盘，不做整体缓冲；
/// 文件句柄在任何退出路径上都随作用域关闭。
/// 同名并发上传不加锁，后写者胜出，属接受的竞争行为。
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Redirect, FsError> {
    let mut target = String::new();
    let mut uploaded: Option<(String, u64)> = None;

    loop {
        let mut field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return Err(FsError::new(FsErrorCode::MissingFileField)
                    .with_message(format!("解析上传表单失败: {}", e)));
            }
        };

        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("path") => {
                // 文件已落盘后再到达的 path 不改变落点，直接忽略
                if uploaded.is_some() {
                    continue;
                }
                target = field.text().await.map_err(|e| {
                    FsError::new(FsErrorCode::InvalidPathFormat)
                        .with_message(format!("读取 path 字段失败: {}", e))
                })?;
            }
            Some("file") => {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| FsError::new(FsErrorCode::MissingFileField))?;

                // 客户端文件名只取基础名，最终落点仍需通过解析器复核
                let basename = Path::new(&filename)
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(str::to_string)
                    .ok_or_else(|| {
                        FsError::new(FsErrorCode::InvalidPathFormat).with_path(filename.clone())
                    })?;

                let relative = state.resolver.normalize(&target)?;
                let dir = state.resolver.resolve(&relative)?;

                // create-if-missing：容忍其他请求并发创建同一目录
                tokio::fs::create_dir_all(&dir).await.map_err(|e| {
                    FsError::new(FsErrorCode::WriteFailed)
                        .with_path(relative.clone())
                        .with_message(format!("创建目录失败: {}", e))
                })?;

                let dest_relative = if relative.is_empty() {
                    basename.clone()
                } else {
                    format!("{}/{}", relative, basename)
                };
                let dest = state.resolver.resolve(&dest_relative)?;

                let mut out = tokio::fs::File::create(&dest).await.map_err(|e| {
                    FsError::new(FsErrorCode::WriteFailed)
                        .with_path(dest_relative.clone())
                        .with_message(format!("创建文件失败: {}", e))
                })?;

                let mut written: u64 = 0;
                loop {
                    let chunk = field.chunk().await.map_err(|e| {
                        FsError::new(FsErrorCode::WriteFailed)
                            .with_path(dest_relative.clone())
                            .with_message(format!("读取上传数据失败: {}", e))
                    })?;
                    let chunk = match chunk {
                        Some(c) => c,
                        None => break,
                    };
                    out.write_all(&chunk).await.map_err(|e| {
                        FsError::new(FsErrorCode::WriteFailed)
                            .with_path(dest_relative.clone())
                            .with_message(format!("写入文件失败: {}", e))
                    })?;
                    written += chunk.len() as u64;
                }
                out.flush().await.map_err(|e| {
                    FsError::new(FsErrorCode::WriteFailed)
                        .with_path(dest_relative.clone())
                        .with_message(format!("写入文件失败: {}", e))
                })?;

                target = relative;
                uploaded = Some((basename, written));
            }
            _ => {}
        }
    }

    let (filename, size) = uploaded.ok_or_else(|| FsError::new(FsErrorCode::MissingFileField))?;
    info!(
        "文件上传成功: {} ({} 字节) -> {}",
        filename,
        size,
        if target.is_empty() { "/" } else { &target }
    );

    // 303 重定向回上传目标目录的列表页
    let redirect_url = if target.is_empty() {
        "/".to_string()
    } else {
        format!("/?path={}", urlencoding::encode(&target))
    };
    Ok(Redirect::to(&redirect_url))
}
