// 访问控制
//
// 将客户端地址分类为本地/非本地，作为所有路由前置的硬性闸门

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::filesystem::{FsError, FsErrorCode};

/// 访问闸门
///
/// `local_only` 为进程级策略开关，启动后不再变更
#[derive(Debug, Clone)]
pub struct AccessGate {
    local_only: bool,
}

impl AccessGate {
    pub fn new(local_only: bool) -> Self {
        Self { local_only }
    }

    pub fn local_only(&self) -> bool {
        self.local_only
    }

    /// 判定客户端地址是否允许访问
    ///
    /// 地址可带端口（`1.2.3.4:5678` 或 `[::1]:5678`），分类前剥离。
    /// 策略关闭时一律放行；策略开启时无法解析的地址一律拒绝。
    pub fn is_permitted(&self, client_addr: &str) -> bool {
        if !self.local_only {
            return true;
        }

        let ip = match parse_client_ip(client_addr) {
            Some(ip) => ip,
            None => {
                warn!("无法解析客户端地址，拒绝访问: {}", client_addr);
                return false;
            }
        };

        if ip.is_loopback() {
            debug!("客户端 {} 为回环地址，放行", ip);
            return true;
        }

        if is_private_range(&ip) {
            debug!("客户端 {} 位于私有网段，放行", ip);
            return true;
        }

        false
    }
}

/// 剥离端口并解析为 IP 地址
fn parse_client_ip(client_addr: &str) -> Option<IpAddr> {
    // 先按带端口的套接字地址解析（兼容 [::1]:8080 形式）
    if let Ok(sock) = client_addr.parse::<SocketAddr>() {
        return Some(sock.ip());
    }
    if let Ok(ip) = client_addr.parse::<IpAddr>() {
        return Some(ip);
    }
    // IPv4 带端口但无法整体解析的兜底：剥掉最后一个冒号之后的部分
    let (host, _) = client_addr.rsplit_once(':')?;
    host.parse::<IpAddr>().ok()
}

/// 私有网段判定
///
/// 10.0.0.0/8、172.16.0.0/12、192.168.0.0/16、169.254.0.0/16（链路本地）、
/// fd00::/8（IPv6 唯一本地）
fn is_private_range(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            let octets = v4.octets();
            match octets {
                [10, ..] => true,
                [172, b, ..] if (16..=31).contains(&b) => true,
                [192, 168, ..] => true,
                [169, 254, ..] => true,
                _ => false,
            }
        }
        IpAddr::V6(v6) => v6.octets()[0] == 0xfd,
    }
}

/// 访问控制中间件
///
/// 在任何路径解析和文件 I/O 之前执行；拒绝时返回 403，不触及文件系统
pub async fn access_gate_middleware(
    State(gate): State<Arc<AccessGate>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: axum::extract::Request,
    next: Next,
) -> Response {
    let client = addr.to_string();
    if !gate.is_permitted(&client) {
        warn!("已拦截非本地网络访问: {}", client);
        return FsError::new(FsErrorCode::AccessDenied)
            .with_path(client)
            .into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_off_permits_everything() {
        let gate = AccessGate::new(false);
        assert!(gate.is_permitted("8.8.8.8"));
        assert!(gate.is_permitted("203.0.113.7:9999"));
    }

    #[test]
    fn test_loopback_permitted() {
        let gate = AccessGate::new(true);
        assert!(gate.is_permitted("127.0.0.1"));
        assert!(gate.is_permitted("127.0.0.1:54321"));
        assert!(gate.is_permitted("::1"));
        assert!(gate.is_permitted("[::1]:8080"));
    }

    #[test]
    fn test_private_ranges_permitted() {
        let gate = AccessGate::new(true);
        assert!(gate.is_permitted("10.0.0.1"));
        assert!(gate.is_permitted("172.16.0.1"));
        assert!(gate.is_permitted("172.31.255.2"));
        assert!(gate.is_permitted("192.168.1.5"));
        assert!(gate.is_permitted("169.254.10.20"));
        assert!(gate.is_permitted("fd00::1"));
    }

    #[test]
    fn test_public_addresses_denied() {
        let gate = AccessGate::new(true);
        assert!(!gate.is_permitted("8.8.8.8"));
        assert!(!gate.is_permitted("8.8.8.8:443"));
        assert!(!gate.is_permitted("172.32.0.1"));
        assert!(!gate.is_permitted("2001:db8::1"));
    }

    #[test]
    fn test_unparsable_denied() {
        let gate = AccessGate::new(true);
        assert!(!gate.is_permitted(""));
        assert!(!gate.is_permitted("not-an-address"));
        assert!(!gate.is_permitted("999.1.1.1"));
    }

    #[test]
    fn test_port_stripping() {
        let gate = AccessGate::new(true);
        assert!(gate.is_permitted("192.168.0.10:60000"));
        assert!(!gate.is_permitted("1.2.3.4:60000"));
    }
}
