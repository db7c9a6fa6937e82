//! 连接 URI 解析
//!
//! 格式：`scheme://[host[:port]][/namespace]`

use url::Url;

use crate::error::{RegistryError, Result};

/// 未指定主机时使用的本地默认地址
pub const DEFAULT_HOST: &str = "127.0.0.1:4001";

/// 传输方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transport {
    Plain,
    Secure,
}

impl Transport {
    /// 对应的 HTTP scheme
    pub fn http_scheme(&self) -> &'static str {
        match self {
            Transport::Plain => "http",
            Transport::Secure => "https",
        }
    }
}

/// 从 URI 解析出的连接参数，在适配器生命周期内不变
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSpec {
    /// URI 原始 scheme（如 etcd、skydns2s）
    pub scheme: String,
    pub transport: Transport,
    /// `host[:port]`，未指定时为 None
    pub host: Option<String>,
    /// host 之后的路径，保留前导 '/'，可能为空
    pub path: String,
}

impl ConnectionSpec {
    /// 解析 URI，transport 由选中的工厂决定
    pub fn parse(uri: &Url, transport: Transport) -> Self {
        let host = uri
            .host_str()
            .filter(|host| !host.is_empty())
            .map(|host| match uri.port() {
                Some(port) => format!("{}:{}", host, port),
                None => host.to_string(),
            });

        Self {
            scheme: uri.scheme().to_string(),
            transport,
            host,
            path: uri.path().to_string(),
        }
    }

    /// 后端连接地址列表
    pub fn endpoints(&self) -> Vec<String> {
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        vec![format!("{}://{}", self.transport.http_scheme(), host)]
    }

    /// DNS 风格后端使用的域名（去掉前导 '/'）
    pub fn domain(&self) -> Result<&str> {
        let domain = self.path.strip_prefix('/').unwrap_or(&self.path);
        if domain.is_empty() {
            return Err(RegistryError::MissingDomain {
                uri: format!(
                    "{}://{}{}",
                    self.scheme,
                    self.host.as_deref().unwrap_or_default(),
                    self.path
                ),
            });
        }
        Ok(domain)
    }
}

/// 解析 URI 字符串
pub fn parse_uri(uri: &str) -> Result<Url> {
    Url::parse(uri).map_err(|e| RegistryError::InvalidUri(format!("{}: {}", uri, e)))
}
