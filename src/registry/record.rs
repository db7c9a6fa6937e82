//! 服务记录定义

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 待注册的服务实例快照
///
/// 由调用方持有，适配器只借用，不会修改。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceRecord {
    /// 实例 ID（在同名服务内唯一）
    pub id: String,

    /// 服务名称
    pub name: String,

    /// 对外发布的 IP
    pub ip: String,

    pub port: u16,

    /// 存活时间（秒），0 表示永不过期
    pub ttl: u64,

    /// 有序标签
    pub tags: Vec<String>,

    /// 自定义属性
    pub attrs: BTreeMap<String, String>,
}

impl ServiceRecord {
    /// 创建新的服务记录
    pub fn new(
        name: impl Into<String>,
        id: impl Into<String>,
        ip: impl Into<String>,
        port: u16,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ip: ip.into(),
            port,
            ttl: 0,
            tags: Vec::new(),
            attrs: BTreeMap::new(),
        }
    }

    /// 设置 TTL
    pub fn with_ttl(mut self, ttl: u64) -> Self {
        self.ttl = ttl;
        self
    }

    /// 追加标签
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// 添加属性
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }
}
