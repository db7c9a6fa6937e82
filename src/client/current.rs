//! etcd v3 客户端

use async_trait::async_trait;
use etcd_client::{Certificate, Client, ConnectOptions, Identity, PutOptions, TlsOptions};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{KeyValueClient, ProtocolVersion};
use crate::config::TlsMaterial;
use crate::error::{RegistryError, Result};

/// 返回 `(新增, 离开)` 的成员地址
fn membership_changes(known: &[String], latest: &[String]) -> (Vec<String>, Vec<String>) {
    let added = latest
        .iter()
        .filter(|url| !known.contains(url))
        .cloned()
        .collect();
    let removed = known
        .iter()
        .filter(|url| !latest.contains(url))
        .cloned()
        .collect();
    (added, removed)
}

/// etcd v3 客户端，TTL 通过 lease 实现
///
/// `members` 与底层负载均衡通道中的端点保持一致，集群同步时按差集增删。
pub struct CurrentClient {
    client: Client,
    members: RwLock<Vec<String>>,
}

impl CurrentClient {
    /// 连接 etcd，提供 TLS 材料时使用双向 TLS
    pub async fn connect(endpoints: &[String], tls: Option<&TlsMaterial>) -> Result<Self> {
        let options = tls.map(|material| {
            let tls = TlsOptions::new()
                .ca_certificate(Certificate::from_pem(&material.ca_pem))
                .identity(Identity::from_pem(&material.cert_pem, &material.key_pem));
            ConnectOptions::new().with_tls(tls)
        });

        let client = Client::connect(endpoints, options).await?;

        Ok(Self {
            client,
            members: RwLock::new(endpoints.to_vec()),
        })
    }

    /// 当前负载均衡使用的成员地址
    pub async fn members(&self) -> Vec<String> {
        self.members.read().await.clone()
    }
}

#[async_trait]
impl KeyValueClient for CurrentClient {
    fn version(&self) -> ProtocolVersion {
        ProtocolVersion::Current
    }

    async fn send_raw_version(&self) -> Result<String> {
        let mut client = self.client.clone();
        let status = client.status().await?;
        Ok(status.version().to_string())
    }

    async fn set(&self, key: &str, value: &str, ttl: u64) -> Result<()> {
        let mut client = self.client.clone();

        let options = if ttl > 0 {
            let ttl = i64::try_from(ttl).unwrap_or(i64::MAX);
            let lease = client.lease_grant(ttl, None).await?;
            debug!(key = %key, lease_id = lease.id(), ttl, "lease granted");
            Some(PutOptions::new().with_lease(lease.id()))
        } else {
            None
        };

        client.put(key, value, options).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<String> {
        let mut client = self.client.clone();
        let resp = client.get(key, None).await?;

        let kv = resp
            .kvs()
            .first()
            .ok_or_else(|| RegistryError::not_found(key))?;
        Ok(kv.value_str()?.to_string())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut client = self.client.clone();
        let resp = client.delete(key, None).await?;

        if resp.deleted() == 0 {
            return Err(RegistryError::not_found(key));
        }
        Ok(())
    }

    async fn sync_cluster(&self) -> Result<Vec<String>> {
        let mut client = self.client.clone();
        let resp = client.member_list().await?;

        let members: Vec<String> = resp
            .members()
            .iter()
            .flat_map(|member| member.client_urls().iter().cloned())
            .collect();

        if members.is_empty() {
            return Err(RegistryError::backend(None, "member list is empty"));
        }

        let mut known = self.members.write().await;
        let (added, removed) = membership_changes(&known, &members);
        for url in &added {
            self.client.add_endpoint(url).await?;
            info!(endpoint = %url, "etcd member added");
        }
        for url in &removed {
            self.client.remove_endpoint(url).await?;
            info!(endpoint = %url, "etcd member removed");
        }

        *known = members.clone();
        Ok(members)
    }
}
