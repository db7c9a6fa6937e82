//! 客户端能力选择
//!
//! 安全传输直接使用 v3 客户端；明文传输先请求 `GET /version`，
//! 响应体匹配 0.4.x 时使用 legacy 客户端，否则使用 v3 客户端。

use regex::Regex;
use std::sync::LazyLock;
use tracing::info;

use super::{ClientBinding, CurrentClient, LegacyClient};
use crate::config::TlsConfig;
use crate::error::{RegistryError, Result};
use crate::registry::uri::{ConnectionSpec, Transport};

// 0.4.x 前面不能是数字或点，避免把 3.0.4 误判为 0.4
static LEGACY_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^0-9.])0\.4\.[0-9]").expect("legacy version pattern is valid")
});

/// 版本响应是否来自 etcd 0.4.x
pub fn is_legacy_version(body: &str) -> bool {
    LEGACY_VERSION.is_match(body)
}

/// 请求 `<endpoint>/version`，请求失败说明后端完全不可达
pub async fn probe_version(endpoint: &str) -> Result<String> {
    let url = format!("{}/version", endpoint.trim_end_matches('/'));
    let unreachable = |e: reqwest::Error| RegistryError::Unreachable {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    };

    let resp = reqwest::get(&url).await.map_err(unreachable)?;
    resp.text().await.map_err(unreachable)
}

/// 为连接参数选择并构造客户端
///
/// `tls` 为 None 且需要安全传输时，从 `ETCD_CERTFILE` / `ETCD_KEYFILE` /
/// `ETCD_CAFILE` 读取证书路径。任何 TLS 相关失败都直接返回错误，不会降级为明文。
pub async fn select_client(
    spec: &ConnectionSpec,
    tls: Option<&TlsConfig>,
) -> Result<ClientBinding> {
    let endpoints = spec.endpoints();

    match spec.transport {
        Transport::Secure => {
            let tls = match tls {
                Some(tls) => tls.clone(),
                None => TlsConfig::from_env()?,
            };
            let material = tls.load()?;

            let client = CurrentClient::connect(&endpoints, Some(&material))
                .await
                .map_err(|e| RegistryError::tls(format!("error creating tls client: {}", e)))?;

            info!(endpoints = ?endpoints, "using tls v3 client");
            Ok(ClientBinding::new(client))
        }
        Transport::Plain => {
            let body = probe_version(&endpoints[0]).await?;

            if is_legacy_version(&body) {
                info!(
                    endpoints = ?endpoints,
                    version = %body.trim(),
                    "using legacy v2 keys client"
                );
                return Ok(ClientBinding::new(LegacyClient::new(endpoints)));
            }

            let client = CurrentClient::connect(&endpoints, None)
                .await
                .map_err(|e| RegistryError::Unreachable {
                    endpoint: endpoints[0].clone(),
                    reason: e.to_string(),
                })?;

            info!(endpoints = ?endpoints, version = %body.trim(), "using v3 client");
            Ok(ClientBinding::new(client))
        }
    }
}
