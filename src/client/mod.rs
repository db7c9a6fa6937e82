//! 键值存储客户端
//!
//! 两代客户端的请求格式互不兼容：
//! - [`legacy::LegacyClient`]：etcd 0.4.x，HTTP v2 keys API
//! - [`current::CurrentClient`]：etcd v3，gRPC（`etcd-client`）
//!
//! 构造时由 [`selector::select_client`] 探测一次版本，选中的客户端
//! 保存在 [`ClientBinding`] 中，之后不再切换。

pub mod current;
pub mod legacy;
pub mod selector;

use async_trait::async_trait;
use std::fmt;
use tracing::{debug, error, info, warn};

use crate::error::Result;

pub use current::CurrentClient;
pub use legacy::LegacyClient;
pub use selector::{is_legacy_version, probe_version, select_client};

/// 协议版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolVersion {
    /// etcd 0.4.x
    Legacy,
    /// etcd v3
    Current,
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolVersion::Legacy => write!(f, "legacy"),
            ProtocolVersion::Current => write!(f, "current"),
        }
    }
}

/// 适配器依赖的后端能力集合
#[async_trait]
pub trait KeyValueClient: Send + Sync {
    /// 客户端对应的协议版本
    fn version(&self) -> ProtocolVersion;

    /// 轻量的版本请求，返回后端报告的版本信息
    async fn send_raw_version(&self) -> Result<String>;

    /// 设置键值，`ttl` 为 0 时不过期
    async fn set(&self, key: &str, value: &str, ttl: u64) -> Result<()>;

    /// 读取键值，不存在时返回 `RegistryError::NotFound`
    async fn get(&self, key: &str) -> Result<String>;

    /// 非递归删除，不存在时返回 `RegistryError::NotFound`
    async fn delete(&self, key: &str) -> Result<()>;

    /// 刷新集群成员列表，返回最新的成员地址
    async fn sync_cluster(&self) -> Result<Vec<String>>;
}

/// 适配器独占的客户端绑定
pub struct ClientBinding {
    client: Box<dyn KeyValueClient>,
}

impl ClientBinding {
    pub fn new(client: impl KeyValueClient + 'static) -> Self {
        Self {
            client: Box::new(client),
        }
    }

    pub fn version(&self) -> ProtocolVersion {
        self.client.version()
    }

    pub fn client(&self) -> &dyn KeyValueClient {
        self.client.as_ref()
    }

    /// 尽力刷新集群成员，失败只记录告警
    ///
    /// 成员信息过期只会影响性能：客户端仍会在已知成员间切换。
    pub async fn sync_cluster(&self) {
        match self.client.sync_cluster().await {
            Ok(members) => {
                debug!(version = %self.version(), members = ?members, "cluster synced");
            }
            Err(e) => {
                warn!(version = %self.version(), error = %e, "sync cluster was unsuccessful");
            }
        }
    }

    /// 同步成员后发送版本请求
    pub async fn ping(&self) -> Result<()> {
        self.sync_cluster().await;
        self.client.send_raw_version().await?;
        Ok(())
    }

    /// 同步成员后写入服务值文档
    pub async fn publish(&self, key: &str, value: &str, ttl: u64) -> Result<()> {
        self.sync_cluster().await;

        match self.client.set(key, value, ttl).await {
            Ok(()) => {
                info!(key = %key, ttl, "service registered");
                Ok(())
            }
            Err(e) => {
                error!(key = %key, error = %e, "failed to register service");
                Err(e)
            }
        }
    }

    /// 同步成员后删除服务键
    pub async fn withdraw(&self, key: &str) -> Result<()> {
        self.sync_cluster().await;

        match self.client.delete(key).await {
            Ok(()) => {
                info!(key = %key, "service deregistered");
                Ok(())
            }
            Err(e) => {
                error!(key = %key, error = %e, "failed to deregister service");
                Err(e)
            }
        }
    }
}

impl fmt::Debug for ClientBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBinding")
            .field("version", &self.version())
            .finish()
    }
}
