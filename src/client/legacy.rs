//! etcd 0.4.x 客户端（HTTP v2 keys API）

use async_trait::async_trait;
use reqwest::{Client as HttpClient, RequestBuilder, Response};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::debug;
use url::Url;

use super::{KeyValueClient, ProtocolVersion};
use crate::error::{RegistryError, Result};

/// etcd v2 错误码：Key not found
const ERROR_KEY_NOT_FOUND: u64 = 100;

#[derive(Debug, Deserialize)]
struct EtcdErrorBody {
    #[serde(rename = "errorCode")]
    error_code: u64,
    message: String,
    #[serde(default)]
    cause: Option<String>,
}

#[derive(Debug, Deserialize)]
struct KeysResponse {
    node: Option<KeysNode>,
}

#[derive(Debug, Deserialize)]
struct KeysNode {
    value: Option<String>,
}

/// etcd 0.4.x 客户端
///
/// 每次请求按顺序尝试已知成员，直到某个成员在传输层有响应。
pub struct LegacyClient {
    http_client: HttpClient,
    machines: RwLock<Vec<String>>,
}

impl LegacyClient {
    pub fn new(endpoints: Vec<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            machines: RwLock::new(endpoints),
        }
    }

    /// 当前已知的集群成员
    pub async fn machines(&self) -> Vec<String> {
        self.machines.read().await.clone()
    }

    /// 把 `path` 按 `/` 拆段追加到成员地址后，每段单独转义
    ///
    /// 键中的 `#`、`?`、`%` 不会被当作片段、查询串或转义序列。
    fn member_url(machine: &Url, path: &str) -> Url {
        let mut url = machine.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(path.split('/').filter(|segment| !segment.is_empty()));
        }
        url
    }

    fn keys_url(machine: &Url, key: &str) -> Url {
        Self::member_url(machine, &format!("/v2/keys/{}", key))
    }

    async fn send<F>(&self, build: F) -> Result<Response>
    where
        F: Fn(&HttpClient, &Url) -> RequestBuilder,
    {
        let machines = self.machines().await;
        let mut last_error = None;

        for machine in &machines {
            let base = match Url::parse(machine) {
                Ok(base) => base,
                Err(e) => {
                    debug!(machine = %machine, error = %e, "skipping malformed etcd member");
                    last_error = Some(RegistryError::from(e));
                    continue;
                }
            };

            match build(&self.http_client, &base).send().await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    debug!(machine = %machine, error = %e, "etcd member did not respond");
                    last_error = Some(e.into());
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            RegistryError::Transport("no etcd cluster members known".to_string())
        }))
    }

    async fn check(resp: Response, key: &str) -> Result<Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        match serde_json::from_str::<EtcdErrorBody>(&body) {
            Ok(err) if err.error_code == ERROR_KEY_NOT_FOUND => Err(RegistryError::not_found(key)),
            Ok(err) => {
                let message = match err.cause {
                    Some(cause) => format!("{} ({})", err.message, cause),
                    None => err.message,
                };
                Err(RegistryError::backend(Some(err.error_code), message))
            }
            Err(_) => Err(RegistryError::backend(Some(u64::from(status.as_u16())), body)),
        }
    }
}

#[async_trait]
impl KeyValueClient for LegacyClient {
    fn version(&self) -> ProtocolVersion {
        ProtocolVersion::Legacy
    }

    async fn send_raw_version(&self) -> Result<String> {
        let resp = self
            .send(|http, machine| http.get(Self::member_url(machine, "version")))
            .await?;
        let resp = Self::check(resp, "/version").await?;
        Ok(resp.text().await?)
    }

    async fn set(&self, key: &str, value: &str, ttl: u64) -> Result<()> {
        let mut form = vec![("value", value.to_string())];
        if ttl > 0 {
            form.push(("ttl", ttl.to_string()));
        }

        let resp = self
            .send(|http, machine| http.put(Self::keys_url(machine, key)).form(&form))
            .await?;
        Self::check(resp, key).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<String> {
        let resp = self
            .send(|http, machine| http.get(Self::keys_url(machine, key)))
            .await?;
        let resp = Self::check(resp, key).await?;
        let body: KeysResponse = resp.json().await?;

        body.node
            .and_then(|node| node.value)
            .ok_or_else(|| RegistryError::not_found(key))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let resp = self
            .send(|http, machine| http.delete(Self::keys_url(machine, key)))
            .await?;
        Self::check(resp, key).await?;
        Ok(())
    }

    async fn sync_cluster(&self) -> Result<Vec<String>> {
        let resp = self
            .send(|http, machine| http.get(Self::member_url(machine, "v2/machines")))
            .await?;
        let resp = Self::check(resp, "/v2/machines").await?;
        let body = resp.text().await?;

        let machines: Vec<String> = body
            .split(',')
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();

        if machines.is_empty() {
            return Err(RegistryError::backend(None, "empty machine list"));
        }

        *self.machines.write().await = machines.clone();
        Ok(machines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn set_puts_value_and_ttl() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/v2/keys/services/web/web-1")
                    .header("content-type", "application/x-www-form-urlencoded")
                    .form_urlencoded_tuple("value", r#"{"ID":"web-1"}"#)
                    .form_urlencoded_tuple("ttl", "30");
                then.status(201)
                    .body(r#"{"action":"set","node":{"key":"/services/web/web-1","value":"x"}}"#);
            })
            .await;

        let client = LegacyClient::new(vec![server.base_url()]);
        client
            .set("/services/web/web-1", r#"{"ID":"web-1"}"#, 30)
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn zero_ttl_omits_ttl_field() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/v2/keys/services/web/web-1")
                    .form_urlencoded_tuple("value", "x")
                    .form_urlencoded_tuple_missing("ttl");
                then.status(201).body(r#"{"action":"set"}"#);
            })
            .await;

        let client = LegacyClient::new(vec![server.base_url()]);
        client.set("/services/web/web-1", "x", 0).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn reserved_characters_in_key_are_escaped() {
        let server = MockServer::start_async().await;
        let hash = server
            .mock_async(|when, then| {
                when.method(PUT).path("/v2/keys/services/web/web%231");
                then.status(201).body(r#"{"action":"set"}"#);
            })
            .await;
        let question = server
            .mock_async(|when, then| {
                when.method(PUT).path("/v2/keys/services/web/a%3Fb");
                then.status(201).body(r#"{"action":"set"}"#);
            })
            .await;
        let percent = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/v2/keys/services/a%252Fb/web-1");
                then.status(200).body(r#"{"action":"delete"}"#);
            })
            .await;

        let client = LegacyClient::new(vec![format!("{}/", server.base_url())]);
        client.set("/services/web/web#1", "x", 0).await.unwrap();
        client.set("/services/web/a?b", "x", 0).await.unwrap();
        client.delete("/services/a%2Fb/web-1").await.unwrap();

        hash.assert_async().await;
        question.assert_async().await;
        percent.assert_async().await;
    }

    #[tokio::test]
    async fn missing_key_maps_to_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/v2/keys/services/web/gone");
                then.status(404).body(
                    r#"{"errorCode":100,"message":"Key not found","cause":"/services/web/gone","index":7}"#,
                );
            })
            .await;

        let client = LegacyClient::new(vec![server.base_url()]);
        let err = client.delete("/services/web/gone").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn other_backend_errors_keep_their_code() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(PUT).path("/v2/keys/services");
                then.status(403)
                    .body(r#"{"errorCode":102,"message":"Not a file","cause":"/services"}"#);
            })
            .await;

        let client = LegacyClient::new(vec![server.base_url()]);
        let err = client.set("/services", "x", 0).await.unwrap_err();
        assert_eq!(
            err,
            RegistryError::backend(Some(102), "Not a file (/services)")
        );
    }

    #[tokio::test]
    async fn get_returns_node_value() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v2/keys/services/web/web-1");
                then.status(200).body(
                    r#"{"action":"get","node":{"key":"/services/web/web-1","value":"{\"ID\":\"web-1\"}","modifiedIndex":9}}"#,
                );
            })
            .await;

        let client = LegacyClient::new(vec![server.base_url()]);
        assert_eq!(
            client.get("/services/web/web-1").await.unwrap(),
            r#"{"ID":"web-1"}"#
        );
    }

    #[tokio::test]
    async fn sync_cluster_replaces_machine_list() {
        let server = MockServer::start_async().await;
        let body = format!("{}, http://10.0.0.2:4001", server.base_url());
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v2/machines");
                then.status(200).body(body.as_str());
            })
            .await;

        let client = LegacyClient::new(vec![server.base_url()]);
        let machines = client.sync_cluster().await.unwrap();

        assert_eq!(machines.len(), 2);
        assert_eq!(client.machines().await, machines);
        assert_eq!(machines[1], "http://10.0.0.2:4001");
    }

    #[tokio::test]
    async fn unreachable_member_is_skipped() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/version");
                then.status(200).body("etcd 0.4.6");
            })
            .await;

        // 端口 1 上没有服务，请求会落到第二个成员
        let client = LegacyClient::new(vec!["http://127.0.0.1:1".to_string(), server.base_url()]);
        assert_eq!(client.send_raw_version().await.unwrap(), "etcd 0.4.6");
    }

    #[tokio::test]
    async fn no_reachable_member_is_a_transport_error() {
        let client = LegacyClient::new(vec!["http://127.0.0.1:1".to_string()]);
        let err = client.send_raw_version().await.unwrap_err();
        assert!(matches!(err, RegistryError::Transport(_)));
    }
}
