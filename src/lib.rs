//! Flare Registry Adapter
//!
//! 可插拔的服务注册适配层：根据连接 URI 选择后端族（etcd / SkyDNS）、
//! 传输方式（明文 / TLS）和协议版本（etcd 0.4.x / v3），
//! 通过统一的 `ping` / `register` / `deregister` / `refresh` 发布或撤销服务实例。
//!
//! ```rust,no_run
//! use flare_registry_adapter::{AdapterRegistry, RegistryAdapter, ServiceRecord};
//!
//! # async fn example() -> flare_registry_adapter::Result<()> {
//! let registry = AdapterRegistry::with_defaults();
//! let adapter = registry.create("etcd://127.0.0.1:2379/services").await?;
//!
//! let service = ServiceRecord::new("web", "host1:web:80", "10.0.0.7", 8080).with_ttl(30);
//! adapter.ping().await?;
//! adapter.register(&service).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod registry;
pub mod telemetry;

// Re-exports
pub use client::{ClientBinding, KeyValueClient, ProtocolVersion};
pub use config::{RegistryConfig, TlsConfig};
pub use error::{ErrorCategory, ErrorCode, RegistryError, Result};
pub use registry::{
    AdapterFactory, AdapterRegistry, AdapterRegistryBuilder, ConnectionSpec, EtcdAdapter,
    EtcdFactory, RegistryAdapter, ServiceRecord, SkyDnsAdapter, SkyDnsFactory, Transport,
};
pub use telemetry::{LogFormat, init_tracing};
