//! 适配器工厂与 scheme 注册表
//!
//! 注册表在进程启动时通过 [`AdapterRegistryBuilder`] 一次性填充，
//! `build()` 之后只读，由需要解析 URI 的组件显式持有。

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

use super::etcd::EtcdAdapter;
use super::skydns::SkyDnsAdapter;
use super::trait_def::RegistryAdapter;
use super::uri::{ConnectionSpec, Transport, parse_uri};
use crate::config::{RegistryConfig, TlsConfig};
use crate::error::{RegistryError, Result};

/// 适配器工厂
#[async_trait]
pub trait AdapterFactory: Send + Sync {
    /// 根据 URI 创建适配器；失败属于构造期错误
    async fn create(&self, uri: &Url) -> Result<Box<dyn RegistryAdapter>>;
}

/// 扁平 etcd 适配器工厂
#[derive(Debug, Clone)]
pub struct EtcdFactory {
    transport: Transport,
    tls: Option<TlsConfig>,
}

impl EtcdFactory {
    pub fn plain() -> Self {
        Self {
            transport: Transport::Plain,
            tls: None,
        }
    }

    pub fn secure() -> Self {
        Self {
            transport: Transport::Secure,
            tls: None,
        }
    }

    /// 使用显式 TLS 配置代替环境变量
    pub fn with_tls(mut self, tls: TlsConfig) -> Self {
        self.tls = Some(tls);
        self
    }
}

#[async_trait]
impl AdapterFactory for EtcdFactory {
    async fn create(&self, uri: &Url) -> Result<Box<dyn RegistryAdapter>> {
        let spec = ConnectionSpec::parse(uri, self.transport);
        let adapter = EtcdAdapter::connect(&spec, self.tls.as_ref()).await?;
        Ok(Box::new(adapter))
    }
}

/// SkyDNS 适配器工厂
#[derive(Debug, Clone)]
pub struct SkyDnsFactory {
    transport: Transport,
    tls: Option<TlsConfig>,
}

impl SkyDnsFactory {
    pub fn plain() -> Self {
        Self {
            transport: Transport::Plain,
            tls: None,
        }
    }

    pub fn secure() -> Self {
        Self {
            transport: Transport::Secure,
            tls: None,
        }
    }

    pub fn with_tls(mut self, tls: TlsConfig) -> Self {
        self.tls = Some(tls);
        self
    }
}

#[async_trait]
impl AdapterFactory for SkyDnsFactory {
    async fn create(&self, uri: &Url) -> Result<Box<dyn RegistryAdapter>> {
        let spec = ConnectionSpec::parse(uri, self.transport);
        let adapter = SkyDnsAdapter::connect(&spec, self.tls.as_ref()).await?;
        Ok(Box::new(adapter))
    }
}

/// 注册表构建器
#[derive(Default)]
pub struct AdapterRegistryBuilder {
    factories: HashMap<String, Arc<dyn AdapterFactory>>,
}

impl AdapterRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为 scheme 注册工厂，同一 scheme 重复注册时后者覆盖前者
    pub fn register(mut self, factory: impl AdapterFactory + 'static, scheme: &str) -> Self {
        let scheme = scheme.to_lowercase();
        if self.factories.insert(scheme.clone(), Arc::new(factory)).is_some() {
            warn!(scheme = %scheme, "adapter factory replaced");
        }
        self
    }

    /// 注册内置的四个 scheme：etcd、etcds、skydns2、skydns2s
    ///
    /// `tls` 为 None 时安全传输在创建适配器时读取环境变量。
    pub fn with_defaults(self, tls: Option<TlsConfig>) -> Self {
        let mut etcds = EtcdFactory::secure();
        let mut skydns2s = SkyDnsFactory::secure();
        if let Some(tls) = tls {
            etcds = etcds.with_tls(tls.clone());
            skydns2s = skydns2s.with_tls(tls);
        }

        self.register(EtcdFactory::plain(), "etcd")
            .register(etcds, "etcds")
            .register(SkyDnsFactory::plain(), "skydns2")
            .register(skydns2s, "skydns2s")
    }

    pub fn build(self) -> AdapterRegistry {
        AdapterRegistry {
            factories: self.factories,
        }
    }
}

/// scheme → 适配器工厂（只读）
pub struct AdapterRegistry {
    factories: HashMap<String, Arc<dyn AdapterFactory>>,
}

impl AdapterRegistry {
    pub fn builder() -> AdapterRegistryBuilder {
        AdapterRegistryBuilder::new()
    }

    /// 内置 scheme，安全传输从环境变量读取 TLS 材料
    pub fn with_defaults() -> Self {
        Self::builder().with_defaults(None).build()
    }

    /// 已注册的 scheme（排序后）
    pub fn schemes(&self) -> Vec<&str> {
        let mut schemes: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        schemes.sort_unstable();
        schemes
    }

    pub fn contains(&self, scheme: &str) -> bool {
        self.factories.contains_key(&scheme.to_lowercase())
    }

    /// 解析 URI 并调用对应工厂
    pub async fn create(&self, uri: &str) -> Result<Box<dyn RegistryAdapter>> {
        let url = parse_uri(uri)?;
        let factory = self
            .factories
            .get(url.scheme())
            .ok_or_else(|| RegistryError::UnknownScheme(url.scheme().to_string()))?;

        let adapter = factory.create(&url).await?;
        info!(scheme = %url.scheme(), "registry adapter created");
        Ok(adapter)
    }

    /// 按配置创建适配器，配置中的 TLS 优先于环境变量
    pub async fn connect(config: &RegistryConfig) -> Result<Box<dyn RegistryAdapter>> {
        Self::builder()
            .with_defaults(config.tls.clone())
            .build()
            .create(&config.uri)
            .await
    }
}
