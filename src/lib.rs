// Local File Server Rust Library
// 本地网络 HTTP 文件服务器核心库

// 访问控制模块
pub mod access;

// 配置管理模块
pub mod config;

// 文件系统模块（路径解析、目录树列表）
pub mod filesystem;

// 日志模块
pub mod logging;

// Web服务器模块
pub mod server;

// 导出常用类型
pub use access::AccessGate;
pub use config::AppConfig;
pub use filesystem::{
    breadcrumbs, BreadcrumbSegment, FsError, FsErrorCode, ListingNode, PathResolver, TreeLister,
    DEFAULT_MAX_DEPTH,
};
pub use server::AppState;
