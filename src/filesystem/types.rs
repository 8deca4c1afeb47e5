// 文件系统模块数据类型定义

use serde::Serialize;

/// 文件系统错误码
/// 错误码范围：40001 - 40099
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsErrorCode {
    /// 路径逃逸出服务根目录
    PathEscape = 40001,
    /// 路径格式无效
    InvalidPathFormat = 40002,
    /// 文件或目录不存在
    NotFound = 40003,
    /// 不是目录
    NotADirectory = 40004,
    /// 不是文件
    NotAFile = 40005,
    /// 目录读取失败
    DirectoryReadFailed = 40006,
    /// 文件写入失败
    WriteFailed = 40007,
    /// 上传表单缺少文件字段
    MissingFileField = 40008,
    /// 访问被拒绝（非本地网络）
    AccessDenied = 40009,
}

impl FsErrorCode {
    pub fn code(&self) -> i32 {
        *self as i32
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::PathEscape => "路径超出服务根目录范围",
            Self::InvalidPathFormat => "路径格式无效",
            Self::NotFound => "文件或目录不存在",
            Self::NotADirectory => "指定路径不是目录",
            Self::NotAFile => "指定路径不是文件",
            Self::DirectoryReadFailed => "读取目录失败",
            Self::WriteFailed => "写入文件失败",
            Self::MissingFileField => "上传表单缺少 file 字段",
            Self::AccessDenied => "仅允许本地网络访问",
        }
    }
}

/// 文件系统错误
#[derive(Debug)]
pub struct FsError {
    pub code: FsErrorCode,
    pub message: String,
    pub path: Option<String>,
}

impl FsError {
    pub fn new(code: FsErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl std::fmt::Display for FsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {}", self.message, path)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for FsError {}

/// 目录树中的一个条目
///
/// 每次请求从磁盘实时构建，不做任何缓存，响应发送后即丢弃
#[derive(Debug, Clone, Serialize)]
pub struct ListingNode {
    /// 条目名称
    pub name: String,
    /// 文件大小（字节，目录为 0）
    pub size: u64,
    /// 是否为目录
    #[serde(rename = "isDir")]
    pub is_dir: bool,
    /// 相对服务根目录的路径（正斜杠分隔，无前导斜杠）
    pub path: String,
    /// 子条目（文件为空；目录在深度限制内展开）
    pub children: Vec<ListingNode>,
}

/// 面包屑导航段
///
/// 由相对路径纯粹派生：每段为（显示名，到该段为止的累积相对路径）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreadcrumbSegment {
    /// 显示名
    pub name: String,
    /// 累积相对路径
    pub path: String,
}

/// 从相对路径派生面包屑段
///
/// 空路径返回空序列；连续分隔符产生的空段被跳过
pub fn breadcrumbs(relative_path: &str) -> Vec<BreadcrumbSegment> {
    let mut segments = Vec::new();
    let mut current = String::new();

    for part in relative_path.split('/') {
        if part.is_empty() {
            continue;
        }
        if !current.is_empty() {
            current.push('/');
        }
        current.push_str(part);
        segments.push(BreadcrumbSegment {
            name: part.to_string(),
            path: current.clone(),
        });
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_error_code() {
        assert_eq!(FsErrorCode::PathEscape.code(), 40001);
        assert_eq!(FsErrorCode::NotFound.code(), 40003);
        assert_eq!(FsErrorCode::AccessDenied.code(), 40009);
    }

    #[test]
    fn test_fs_error_builders() {
        let err = FsError::new(FsErrorCode::PathEscape).with_path("../etc/passwd");
        assert_eq!(err.code, FsErrorCode::PathEscape);
        assert_eq!(err.path.as_deref(), Some("../etc/passwd"));
        assert!(err.to_string().contains("../etc/passwd"));
    }

    #[test]
    fn test_breadcrumbs_empty() {
        assert!(breadcrumbs("").is_empty());
    }

    #[test]
    fn test_breadcrumbs_nested() {
        let crumbs = breadcrumbs("projects/2024/reports");
        assert_eq!(crumbs.len(), 3);
        assert_eq!(crumbs[0].name, "projects");
        assert_eq!(crumbs[0].path, "projects");
        assert_eq!(crumbs[1].path, "projects/2024");
        assert_eq!(crumbs[2].path, "projects/2024/reports");
    }

    #[test]
    fn test_breadcrumbs_skips_empty_segments() {
        let crumbs = breadcrumbs("a//b/");
        assert_eq!(crumbs.len(), 2);
        assert_eq!(crumbs[1].path, "a/b");
    }
}
