//! 错误类型转换实现

use super::RegistryError;
use std::io;

impl From<io::Error> for RegistryError {
    fn from(err: io::Error) -> Self {
        RegistryError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::Serialization(format!("JSON 序列化错误: {}", err))
    }
}

impl From<url::ParseError> for RegistryError {
    fn from(err: url::ParseError) -> Self {
        RegistryError::InvalidUri(err.to_string())
    }
}

impl From<toml::de::Error> for RegistryError {
    fn from(err: toml::de::Error) -> Self {
        RegistryError::Configuration(err.to_string())
    }
}

impl From<reqwest::Error> for RegistryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RegistryError::Serialization(err.to_string())
        } else {
            RegistryError::Transport(err.to_string())
        }
    }
}

impl From<etcd_client::Error> for RegistryError {
    fn from(err: etcd_client::Error) -> Self {
        match err {
            etcd_client::Error::GRpcStatus(status) => RegistryError::backend(
                Some(status.code() as u64),
                status.message().to_string(),
            ),
            other => RegistryError::Transport(other.to_string()),
        }
    }
}
