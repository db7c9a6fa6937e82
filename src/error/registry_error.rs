//! 注册适配层统一错误类型

use super::code::{ErrorCategory, ErrorCode};
use thiserror::Error;

/// 注册适配层统一错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// 连接 URI 无法解析
    #[error("无效的连接 URI: {0}")]
    InvalidUri(String),

    /// 没有为该 scheme 注册适配器工厂
    #[error("未注册的 scheme: {0}")]
    UnknownScheme(String),

    /// DNS 风格后端缺少域名，例如 skydns2://<host>/<domain>
    #[error("缺少 DNS 域名: {uri}")]
    MissingDomain { uri: String },

    /// TLS 证书材料缺失或无效
    #[error("TLS 材料无效: {reason}")]
    TlsMaterial { reason: String },

    /// 配置文件错误
    #[error("配置错误: {0}")]
    Configuration(String),

    /// 构造期版本探测失败，后端完全不可达
    #[error("后端不可达 [{endpoint}]: {reason}")]
    Unreachable { endpoint: String, reason: String },

    /// 单次调用的网络/传输失败
    #[error("传输错误: {0}")]
    Transport(String),

    /// 后端返回了错误响应
    #[error("后端错误 [{code:?}] {message}")]
    Backend { code: Option<u64>, message: String },

    /// 键不存在
    #[error("键不存在: {key}")]
    NotFound { key: String },

    /// 序列化错误
    #[error("序列化错误: {0}")]
    Serialization(String),

    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(String),
}

impl RegistryError {
    pub fn tls(reason: impl Into<String>) -> Self {
        RegistryError::TlsMaterial {
            reason: reason.into(),
        }
    }

    pub fn backend(code: Option<u64>, message: impl Into<String>) -> Self {
        RegistryError::Backend {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(key: impl Into<String>) -> Self {
        RegistryError::NotFound { key: key.into() }
    }

    /// 获取错误代码
    pub fn code(&self) -> ErrorCode {
        match self {
            RegistryError::InvalidUri(_) => ErrorCode::InvalidUri,
            RegistryError::UnknownScheme(_) => ErrorCode::UnknownScheme,
            RegistryError::MissingDomain { .. } => ErrorCode::MissingDomain,
            RegistryError::TlsMaterial { .. } => ErrorCode::TlsMaterialInvalid,
            RegistryError::Configuration(_) => ErrorCode::ConfigurationError,
            RegistryError::Unreachable { .. } => ErrorCode::BackendUnreachable,
            RegistryError::Transport(_) => ErrorCode::TransportFailed,
            RegistryError::Backend { .. } => ErrorCode::BackendRejected,
            RegistryError::NotFound { .. } => ErrorCode::KeyNotFound,
            RegistryError::Serialization(_) => ErrorCode::SerializationError,
            RegistryError::Io(_) => ErrorCode::IoError,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        self.code().category()
    }

    /// 是否为构造期错误（当前配置下适配器无法工作）
    pub fn is_construction(&self) -> bool {
        self.category() == ErrorCategory::Construction
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::NotFound { .. })
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, RegistryError>;
