//! 错误代码和错误类别定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 错误代码枚举
///
/// 错误代码按类别分组，每个类别占用1000个代码范围：
/// - 1000-1999: 连接相关错误
/// - 3000-3999: 协议相关错误
/// - 4000-4999: 键值相关错误
/// - 6000-6999: 配置相关错误
/// - 8000-8999: 序列化相关错误
/// - 9000-9999: 通用错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum ErrorCode {
    // ============================================================
    // 连接相关错误 (1000-1999)
    // ============================================================
    BackendUnreachable = 1000,
    TransportFailed = 1001,

    // ============================================================
    // 协议相关错误 (3000-3999)
    // ============================================================
    BackendRejected = 3000,
    UnknownScheme = 3001,

    // ============================================================
    // 键值相关错误 (4000-4999)
    // ============================================================
    KeyNotFound = 4000,

    // ============================================================
    // 配置相关错误 (6000-6999)
    // ============================================================
    InvalidUri = 6000,
    MissingDomain = 6001,
    TlsMaterialInvalid = 6002,
    ConfigurationError = 6003,

    // ============================================================
    // 序列化相关错误 (8000-8999)
    // ============================================================
    SerializationError = 8000,

    // ============================================================
    // 通用错误 (9000-9999)
    // ============================================================
    IoError = 9000,
}

impl ErrorCode {
    /// 获取错误代码的数值
    pub fn as_u32(&self) -> u32 {
        *self as u32
    }

    /// 获取错误代码的字符串表示
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::BackendUnreachable => "BACKEND_UNREACHABLE",
            ErrorCode::TransportFailed => "TRANSPORT_FAILED",
            ErrorCode::BackendRejected => "BACKEND_REJECTED",
            ErrorCode::UnknownScheme => "UNKNOWN_SCHEME",
            ErrorCode::KeyNotFound => "KEY_NOT_FOUND",
            ErrorCode::InvalidUri => "INVALID_URI",
            ErrorCode::MissingDomain => "MISSING_DOMAIN",
            ErrorCode::TlsMaterialInvalid => "TLS_MATERIAL_INVALID",
            ErrorCode::ConfigurationError => "CONFIGURATION_ERROR",
            ErrorCode::SerializationError => "SERIALIZATION_ERROR",
            ErrorCode::IoError => "IO_ERROR",
        }
    }

    /// 获取错误代码的类别
    ///
    /// 构造期错误意味着当前配置无法继续运行；其余错误只影响单次调用。
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorCode::BackendUnreachable
            | ErrorCode::UnknownScheme
            | ErrorCode::InvalidUri
            | ErrorCode::MissingDomain
            | ErrorCode::TlsMaterialInvalid
            | ErrorCode::ConfigurationError => ErrorCategory::Construction,
            _ => ErrorCategory::Call,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.as_str(), self.as_u32())
    }
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    /// 适配器构造期错误
    Construction,
    /// 单次调用错误，可由调用方稍后重试
    Call,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Construction => write!(f, "CONSTRUCTION"),
            ErrorCategory::Call => write!(f, "CALL"),
        }
    }
}
