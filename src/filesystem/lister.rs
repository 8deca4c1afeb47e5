// 目录树列表
//
// 在深度限制内递归枚举目录内容，构建 ListingNode 层级结构

use std::fs;

use tracing::warn;

use super::resolver::PathResolver;
use super::types::{FsError, FsErrorCode, ListingNode};

/// 默认递归深度
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// 目录树列表器
///
/// 每一层递归都通过 [`PathResolver`] 重新派生解析路径，
/// 因此产出的条目不可能越出服务根目录
pub struct TreeLister {
    resolver: PathResolver,
}

impl TreeLister {
    /// 创建新的列表器
    pub fn new(resolver: PathResolver) -> Self {
        Self { resolver }
    }

    /// 列出 `relative_path` 下的目录树
    ///
    /// 条目顺序为底层目录读取的原始顺序（文件系统顺序，非排序），
    /// 与参考行为保持一致。
    ///
    /// `max_depth` 为剩余递归深度：为 0 时目录仍作为条目出现，
    /// 但 children 为空，不再展开。子目录递归失败（如权限不足）时
    /// 该子目录的 children 置空，兄弟条目不受影响。
    pub fn list(&self, relative_path: &str, max_depth: usize) -> Result<Vec<ListingNode>, FsError> {
        let relative = self.resolver.normalize(relative_path)?;
        let dir = self.resolver.resolve(&relative)?;

        // 列表目标必须是目录；不存在的路径仍由下方 read_dir 映射为 NotFound
        if dir.is_file() {
            return Err(FsError::new(FsErrorCode::NotADirectory).with_path(relative));
        }

        let read_dir = fs::read_dir(&dir).map_err(|e| {
            warn!("读取目录失败: {:?}, 错误: {}", dir, e);
            let code = if e.kind() == std::io::ErrorKind::NotFound {
                FsErrorCode::NotFound
            } else {
                FsErrorCode::DirectoryReadFailed
            };
            FsError::new(code)
                .with_path(relative.clone())
                .with_message(format!("读取目录失败: {}", e))
        })?;

        let mut nodes = Vec::new();
        for entry in read_dir.flatten() {
            // 单个条目的元数据读取失败时跳过该条目
            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(_) => continue,
            };

            let name = entry.file_name().to_string_lossy().into_owned();
            let entry_path = if relative.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", relative, name)
            };

            let is_dir = metadata.is_dir();
            let children = if is_dir && max_depth > 0 {
                // 递归路径重新经过解析器派生，保持包含检查
                self.list(&entry_path, max_depth - 1).unwrap_or_default()
            } else {
                Vec::new()
            };

            nodes.push(ListingNode {
                name,
                size: if is_dir { 0 } else { metadata.len() },
                is_dir,
                path: entry_path,
                children,
            });
        }

        Ok(nodes)
    }
}
