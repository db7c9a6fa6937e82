//! 服务注册适配器模块
//!
//! 支持两种后端族：扁平 etcd 服务树与 SkyDNS 反向域名树，
//! 每种都有明文和 TLS 两个 scheme。

pub mod etcd;
pub mod factory;
pub mod path;
pub mod record;
pub mod skydns;
pub mod trait_def;
pub mod uri;

pub use etcd::EtcdAdapter;
pub use factory::{
    AdapterFactory, AdapterRegistry, AdapterRegistryBuilder, EtcdFactory, SkyDnsFactory,
};
pub use path::{domain_path, encode_dns_record, encode_service, service_key};
pub use record::ServiceRecord;
pub use skydns::SkyDnsAdapter;
pub use trait_def::RegistryAdapter;
pub use uri::{ConnectionSpec, DEFAULT_HOST, Transport};
