//! 日志初始化
//!
//! `RUST_LOG` 优先于传入的默认级别。重复初始化返回错误但不会 panic。

use tracing_subscriber::EnvFilter;

use crate::error::{RegistryError, Result};

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// 安装全局 tracing subscriber
pub fn init_tracing(default_level: &str, format: LogFormat) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|e| RegistryError::Configuration(format!("failed to initialize tracing: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_an_error_not_a_panic() {
        let _ = init_tracing("debug", LogFormat::Text);
        assert!(init_tracing("info", LogFormat::Json).is_err());
    }
}
