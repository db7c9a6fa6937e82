//! etcd 注册适配器（扁平服务树）

use async_trait::async_trait;

use super::path::{encode_service, service_key};
use super::record::ServiceRecord;
use super::trait_def::RegistryAdapter;
use super::uri::ConnectionSpec;
use crate::client::{ClientBinding, ProtocolVersion, select_client};
use crate::config::TlsConfig;
use crate::error::Result;

/// etcd 注册适配器
///
/// 键：`<uri path>/<name>/<id>`，值：`{"ID","Name","Port","IP","Tags","Attrs"}`
#[derive(Debug)]
pub struct EtcdAdapter {
    binding: ClientBinding,
    path: String,
}

impl EtcdAdapter {
    /// 按连接参数探测版本并创建适配器
    pub async fn connect(spec: &ConnectionSpec, tls: Option<&TlsConfig>) -> Result<Self> {
        let binding = select_client(spec, tls).await?;
        Ok(Self::new(binding, spec.path.clone()))
    }

    pub fn new(binding: ClientBinding, path: impl Into<String>) -> Self {
        Self {
            binding,
            path: path.into(),
        }
    }

    pub fn version(&self) -> ProtocolVersion {
        self.binding.version()
    }

    pub fn service_path(&self, service: &ServiceRecord) -> String {
        service_key(&self.path, service)
    }

    /// 读取已注册的值文档
    pub async fn lookup(&self, service: &ServiceRecord) -> Result<String> {
        self.binding.client().get(&self.service_path(service)).await
    }
}

#[async_trait]
impl RegistryAdapter for EtcdAdapter {
    async fn ping(&self) -> Result<()> {
        self.binding.ping().await
    }

    async fn register(&self, service: &ServiceRecord) -> Result<()> {
        let value = encode_service(service)?;
        self.binding
            .publish(&self.service_path(service), &value, service.ttl)
            .await
    }

    async fn deregister(&self, service: &ServiceRecord) -> Result<()> {
        self.binding.withdraw(&self.service_path(service)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::LegacyClient;
    use httpmock::prelude::*;

    fn adapter(server: &MockServer) -> EtcdAdapter {
        let binding = ClientBinding::new(LegacyClient::new(vec![server.base_url()]));
        EtcdAdapter::new(binding, "/services")
    }

    fn record() -> ServiceRecord {
        ServiceRecord::new("web", "web-1", "10.0.0.7", 8080).with_ttl(30)
    }

    #[tokio::test]
    async fn register_sets_key_under_namespace() {
        let server = MockServer::start_async().await;
        let set = server
            .mock_async(|when, then| {
                when.method(PUT).path("/v2/keys/services/web/web-1");
                then.status(201).body(r#"{"action":"set"}"#);
            })
            .await;

        let adapter = adapter(&server);
        adapter.register(&record()).await.unwrap();
        adapter.refresh(&record()).await.unwrap();

        assert_eq!(set.hits_async().await, 2);
    }

    #[tokio::test]
    async fn failed_cluster_sync_does_not_block_register() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v2/machines");
                then.status(500).body("boom");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(PUT).path("/v2/keys/services/web/web-1");
                then.status(200).body(r#"{"action":"set"}"#);
            })
            .await;

        assert!(adapter(&server).register(&record()).await.is_ok());
    }

    #[tokio::test]
    async fn register_failure_is_returned() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(PUT).path("/v2/keys/services/web/web-1");
                then.status(500)
                    .body(r#"{"errorCode":300,"message":"Raft Internal Error"}"#);
            })
            .await;

        let err = adapter(&server).register(&record()).await.unwrap_err();
        assert!(!err.is_construction());
    }

    #[tokio::test]
    async fn double_deregister_reports_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/v2/keys/services/web/web-1");
                then.status(404).body(
                    r#"{"errorCode":100,"message":"Key not found","cause":"/services/web/web-1"}"#,
                );
            })
            .await;

        let err = adapter(&server).deregister(&record()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn ping_sends_version_request() {
        let server = MockServer::start_async().await;
        let version = server
            .mock_async(|when, then| {
                when.method(GET).path("/version");
                then.status(200).body("etcd 0.4.6");
            })
            .await;

        adapter(&server).ping().await.unwrap();
        version.assert_async().await;
    }
}
