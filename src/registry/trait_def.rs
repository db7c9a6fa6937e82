//! 注册适配器 Trait 定义

use super::record::ServiceRecord;
use crate::error::Result;
use async_trait::async_trait;

/// 注册适配器 Trait
///
/// 每个后端族（扁平 etcd、SkyDNS）各有一个实现，外部系统只依赖这一组操作。
#[async_trait]
pub trait RegistryAdapter: Send + Sync {
    /// 探活：刷新集群成员后发送一次版本请求
    async fn ping(&self) -> Result<()>;

    /// 注册服务，重复调用会覆盖旧值并重置 TTL
    async fn register(&self, service: &ServiceRecord) -> Result<()>;

    /// 注销服务
    async fn deregister(&self, service: &ServiceRecord) -> Result<()>;

    /// 续期（默认实现：重新注册）
    async fn refresh(&self, service: &ServiceRecord) -> Result<()> {
        self.register(service).await
    }
}
