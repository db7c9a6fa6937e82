//! 键路径与值编码
//!
//! 两种后端约定：
//! - 扁平服务树：`<path>/<name>/<id>`，值包含完整元数据
//! - SkyDNS 反向域名树：`/skydns/<反转的域名段>/<name>/<id>`，值只有 host/port

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use super::record::ServiceRecord;
use crate::error::Result;

/// SkyDNS 键空间根
pub const SKYDNS_ROOT: &str = "/skydns";

/// 服务实例键：`<namespace>/<name>/<id>`
pub fn service_key(namespace: &str, service: &ServiceRecord) -> String {
    format!("{}/{}/{}", namespace, service.name, service.id)
}

/// 将域名转换为 SkyDNS 键空间，如 `service.example` → `/skydns/example/service`
pub fn domain_path(domain: &str) -> String {
    let components: Vec<&str> = domain.split('.').rev().collect();
    format!("{}/{}", SKYDNS_ROOT, components.join("/"))
}

#[derive(Serialize)]
struct ServiceDocument<'a> {
    #[serde(rename = "ID")]
    id: &'a str,
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Port")]
    port: u16,
    #[serde(rename = "IP")]
    ip: &'a str,
    #[serde(rename = "Tags")]
    tags: Value,
    #[serde(rename = "Attrs")]
    attrs: Value,
}

/// 扁平服务树的值文档
///
/// 标签和属性分别序列化，任一失败只记录告警并以空结构代替，
/// 注册仍然继续。
pub fn encode_service(service: &ServiceRecord) -> Result<String> {
    let tags = serde_json::to_value(&service.tags).unwrap_or_else(|e| {
        warn!(service_id = %service.id, error = %e, "failed to marshal tags");
        Value::Array(Vec::new())
    });
    let attrs = serde_json::to_value(&service.attrs).unwrap_or_else(|e| {
        warn!(service_id = %service.id, error = %e, "failed to marshal attrs");
        Value::Object(serde_json::Map::new())
    });

    let document = ServiceDocument {
        id: &service.id,
        name: &service.name,
        port: service.port,
        ip: &service.ip,
        tags,
        attrs,
    };

    Ok(serde_json::to_string(&document)?)
}

#[derive(Serialize)]
struct DnsRecord<'a> {
    host: &'a str,
    port: u16,
}

/// SkyDNS 记录：`{"host":"<ip>","port":<port>}`
pub fn encode_dns_record(service: &ServiceRecord) -> Result<String> {
    Ok(serde_json::to_string(&DnsRecord {
        host: &service.ip,
        port: service.port,
    })?)
}
