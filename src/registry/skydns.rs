//! SkyDNS 注册适配器（反向域名树）

use async_trait::async_trait;

use super::path::{domain_path, encode_dns_record, service_key};
use super::record::ServiceRecord;
use super::trait_def::RegistryAdapter;
use super::uri::ConnectionSpec;
use crate::client::{ClientBinding, ProtocolVersion, select_client};
use crate::config::TlsConfig;
use crate::error::Result;

/// SkyDNS 注册适配器
///
/// URI 路径即 DNS 域名，例如 `skydns2://127.0.0.1:4001/skydns.local`
/// 对应键空间 `/skydns/local/skydns`。
#[derive(Debug)]
pub struct SkyDnsAdapter {
    binding: ClientBinding,
    path: String,
}

impl SkyDnsAdapter {
    /// 先校验域名，再探测版本并创建适配器
    pub async fn connect(spec: &ConnectionSpec, tls: Option<&TlsConfig>) -> Result<Self> {
        let path = domain_path(spec.domain()?);
        let binding = select_client(spec, tls).await?;
        Ok(Self { binding, path })
    }

    /// `domain` 为 DNS 域名（如 `service.example`）
    pub fn new(binding: ClientBinding, domain: &str) -> Self {
        Self {
            binding,
            path: domain_path(domain),
        }
    }

    pub fn version(&self) -> ProtocolVersion {
        self.binding.version()
    }

    /// 域名对应的键空间根
    pub fn namespace(&self) -> &str {
        &self.path
    }

    pub fn service_path(&self, service: &ServiceRecord) -> String {
        service_key(&self.path, service)
    }

    pub async fn lookup(&self, service: &ServiceRecord) -> Result<String> {
        self.binding.client().get(&self.service_path(service)).await
    }
}

#[async_trait]
impl RegistryAdapter for SkyDnsAdapter {
    async fn ping(&self) -> Result<()> {
        self.binding.ping().await
    }

    async fn register(&self, service: &ServiceRecord) -> Result<()> {
        let record = encode_dns_record(service)?;
        self.binding
            .publish(&self.service_path(service), &record, service.ttl)
            .await
    }

    async fn deregister(&self, service: &ServiceRecord) -> Result<()> {
        self.binding.withdraw(&self.service_path(service)).await
    }
}
