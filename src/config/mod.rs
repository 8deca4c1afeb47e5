// 配置管理模块

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// 文件服务配置
    #[serde(default)]
    pub serve: ServeConfig,
    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// 文件服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServeConfig {
    /// 服务根目录（缺省为 ~/Downloads）
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,
    /// 是否仅允许本地网络访问
    #[serde(default = "default_local_only")]
    pub local_only: bool,
    /// 目录树最大递归深度
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_root_dir() -> PathBuf {
    home_dir().join("Downloads")
}

fn default_local_only() -> bool {
    true
}

fn default_max_depth() -> usize {
    crate::filesystem::DEFAULT_MAX_DEPTH
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            local_only: default_local_only(),
            max_depth: default_max_depth(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 是否启用日志文件持久化
    #[serde(default = "default_log_enabled")]
    pub enabled: bool,
    /// 日志文件保存目录
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// 日志保留天数（默认 7 天）
    #[serde(default = "default_log_retention_days")]
    pub retention_days: u32,
    /// 日志级别（默认 info）
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_enabled() -> bool {
    true
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_retention_days() -> u32 {
    7
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: default_log_enabled(),
            log_dir: default_log_dir(),
            retention_days: default_log_retention_days(),
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// 从配置文件加载，失败时返回默认配置
    pub async fn load_or_default(path: &str) -> Self {
        match fs::read_to_string(path).await {
            Ok(content) => match toml::from_str::<AppConfig>(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("配置文件解析失败: {}, 使用默认配置", e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}

/// 当前用户主目录
///
/// 取不到环境变量时退回当前目录
pub fn home_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    let var = std::env::var_os("USERPROFILE");
    #[cfg(not(target_os = "windows"))]
    let var = std::env::var_os("HOME");

    var.map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.serve.local_only);
        assert_eq!(config.serve.max_depth, 10);
        assert!(config.serve.root_dir.ends_with("Downloads"));
        assert!(config.log.enabled);
        assert_eq!(config.log.retention_days, 7);
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml_str = r#"
            [server]
            port = 9000

            [serve]
            local_only = false
        "#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(!config.serve.local_only);
        assert_eq!(config.serve.max_depth, 10);
    }

    #[tokio::test]
    async fn test_load_missing_file_falls_back_to_default() {
        let config = AppConfig::load_or_default("/no/such/config.toml").await;
        assert_eq!(config.server.port, 8080);
    }
}
