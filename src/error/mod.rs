//! 注册适配层错误处理模块
//!
//! 区分两类错误：构造期错误（后端不可达、TLS 材料无效、缺少 DNS 域名）
//! 与单次调用错误（注册、注销、探活失败）。两者都以 `Result` 返回给调用方。

pub mod code;
pub mod conversions;
pub mod registry_error;

pub use code::{ErrorCategory, ErrorCode};
pub use registry_error::{RegistryError, Result};
