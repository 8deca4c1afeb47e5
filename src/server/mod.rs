// Web服务器模块

pub mod handlers;
pub mod render;
pub mod state;

pub use state::AppState;

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::access::access_gate_middleware;

/// 组装路由表
///
/// 访问闸门中间件包裹全部路由，在任何路径解析之前执行
pub fn build_router(state: AppState) -> Router {
    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http()) // HTTP 请求日志
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    Router::new()
        .route(
            "/",
            get(handlers::browse::index).post(handlers::browse::upload),
        )
        .route("/download/*path", get(handlers::download::download))
        // 空路径的下载请求直接判为 400，而不是落入路由 404
        .route("/download", get(handlers::download::missing_path))
        .route("/download/", get(handlers::download::missing_path))
        // 上传体不设大小上限，请求体直接流式落盘
        .layer(DefaultBodyLimit::disable())
        .layer(middleware::from_fn_with_state(
            state.gate.clone(),
            access_gate_middleware,
        ))
        .with_state(state)
        .layer(middleware_stack)
}

/// 启动服务器并阻塞直至退出
pub async fn serve(state: AppState) -> Result<()> {
    let addr = format!(
        "{}:{}",
        state.config.server.host, state.config.server.port
    );
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("绑定监听地址失败: {}", addr))?;

    info!("服务器启动在: http://{}", addr);
    info!("服务根目录: {:?}", state.resolver.root());
    info!("仅限本地网络访问: {}", state.gate.local_only());
    info!(
        "浏览地址: http://localhost:{}/",
        state.config.server.port
    );

    let app = build_router(state).into_make_service_with_connect_info::<SocketAddr>();
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("服务器错误: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("收到 Ctrl+C，开始优雅关闭...");
        }
    }

    info!("应用已安全退出");
    Ok(())
}
