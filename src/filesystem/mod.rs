// 文件系统子系统
//
// 路径安全解析与目录树列表

pub mod lister;
pub mod resolver;
pub mod types;

pub use lister::{TreeLister, DEFAULT_MAX_DEPTH};
pub use resolver::PathResolver;
pub use types::{breadcrumbs, BreadcrumbSegment, FsError, FsErrorCode, ListingNode};
