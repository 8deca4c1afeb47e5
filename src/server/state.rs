// 应用状态

use anyhow::{bail, Context, Result};
use std::sync::Arc;

use crate::access::AccessGate;
use crate::config::AppConfig;
use crate::filesystem::{PathResolver, TreeLister};

/// 应用全局状态
///
/// 启动时构建一次，此后只读；请求之间不共享任何可变状态
#[derive(Clone)]
pub struct AppState {
    /// 应用配置
    pub config: Arc<AppConfig>,
    /// 路径解析器
    pub resolver: Arc<PathResolver>,
    /// 目录树列表器
    pub lister: Arc<TreeLister>,
    /// 访问闸门
    pub gate: Arc<AccessGate>,
}

impl AppState {
    /// 创建新的应用状态
    ///
    /// 服务根目录在此处规范化并校验；不存在或不是目录属于启动期致命错误
    pub fn new(config: AppConfig) -> Result<Self> {
        let root = dunce::canonicalize(&config.serve.root_dir)
            .with_context(|| format!("服务根目录不存在: {:?}", config.serve.root_dir))?;
        if !root.is_dir() {
            bail!("服务根目录不是目录: {:?}", root);
        }

        let resolver = PathResolver::new(root);
        let lister = TreeLister::new(resolver.clone());
        let gate = AccessGate::new(config.serve.local_only);

        Ok(Self {
            config: Arc::new(config),
            resolver: Arc::new(resolver),
            lister: Arc::new(lister),
            gate: Arc::new(gate),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_state_with_valid_root() {
        let tmp = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.serve.root_dir = tmp.path().to_path_buf();

        let state = AppState::new(config).unwrap();
        assert!(state.resolver.root().is_absolute());
    }

    #[test]
    fn test_state_with_missing_root_fails() {
        let mut config = AppConfig::default();
        config.serve.root_dir = "/no/such/dir/anywhere".into();
        assert!(AppState::new(config).is_err());
    }
}
