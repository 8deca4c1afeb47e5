use std::path::PathBuf;

use clap::Parser;
use local_file_server_rust::{config::AppConfig, logging, server, AppState};
use tracing::info;

/// 本地网络 HTTP 文件服务器：浏览、上传、下载共享目录
#[derive(Parser, Debug)]
#[command(name = "local-file-server")]
#[command(version, about, long_about = None)]
struct Cli {
    /// 监听端口
    #[arg(long, value_name = "PORT")]
    port: Option<u16>,

    /// 服务根目录（默认 ~/Downloads）
    #[arg(long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// 是否仅允许本地网络访问
    #[arg(long, value_name = "BOOL")]
    local: Option<bool>,

    /// 配置文件路径
    #[arg(long, value_name = "FILE", default_value = "config/app.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 先加载配置文件，命令行参数覆盖文件内容
    let mut config = AppConfig::load_or_default(&cli.config).await;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(dir) = cli.dir {
        config.serve.root_dir = dir;
    }
    if let Some(local) = cli.local {
        config.serve.local_only = local;
    }

    // 初始化日志系统（必须保持 _log_guard 存活）
    let _log_guard = logging::init_logging(&config.log);

    info!(
        "Local File Server v{} 启动中...",
        env!("CARGO_PKG_VERSION")
    );

    // 服务根目录校验失败属启动期致命错误
    let state = AppState::new(config)?;

    server::serve(state).await
}
