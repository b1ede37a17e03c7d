use std::{env, time::Duration};

use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;

/// Retry mode applied to the SDK client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryMode {
    Standard,
    Adaptive,
}

/// Client configuration loaded from environment variables.
///
/// Covers the connection-level knobs that are deliberately outside the request
/// shaping core: SDK retry count and mode, operation/connect timeouts, and the
/// default table name.
#[derive(Debug, Clone)]
pub struct DynamoConfig {
    /// Maximum SDK-level attempts per call (default: 10)
    pub max_attempts: u32,
    /// SDK retry mode (default: adaptive)
    pub retry_mode: RetryMode,
    /// Per-operation timeout in milliseconds, unset by default
    pub operation_timeout_ms: Option<u64>,
    /// Connect timeout in milliseconds, unset by default
    pub connect_timeout_ms: Option<u64>,
    /// Default table name (default: "dynokit")
    pub table_name: String,
}

impl DynamoConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DYNOKIT_MAX_ATTEMPTS` - Maximum SDK attempts per call (default: 10)
    /// - `DYNOKIT_RETRY_MODE` - `standard` or `adaptive` (default: adaptive)
    /// - `DYNOKIT_OPERATION_TIMEOUT_MS` - Per-operation timeout (default: unset)
    /// - `DYNOKIT_CONNECT_TIMEOUT_MS` - Connect timeout (default: unset)
    /// - `DYNAMODB_TABLE_NAME` - Default table name (default: "dynokit")
    pub fn from_env() -> Self {
        Self {
            max_attempts: env::var("DYNOKIT_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            retry_mode: match env::var("DYNOKIT_RETRY_MODE").as_deref() {
                Ok("standard") => RetryMode::Standard,
                _ => RetryMode::Adaptive,
            },
            operation_timeout_ms: env::var("DYNOKIT_OPERATION_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok()),
            connect_timeout_ms: env::var("DYNOKIT_CONNECT_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok()),
            table_name: env::var("DYNAMODB_TABLE_NAME").unwrap_or_else(|_| "dynokit".to_string()),
        }
    }

    /// SDK retry configuration derived from this config.
    pub fn retry_config(&self) -> RetryConfig {
        let base = match self.retry_mode {
            RetryMode::Standard => RetryConfig::standard(),
            RetryMode::Adaptive => RetryConfig::adaptive(),
        };
        base.with_max_attempts(self.max_attempts)
    }

    /// SDK timeout configuration derived from this config.
    pub fn timeout_config(&self) -> TimeoutConfig {
        let mut builder = TimeoutConfig::builder();
        builder
            .set_operation_timeout(self.operation_timeout_ms.map(Duration::from_millis))
            .set_connect_timeout(self.connect_timeout_ms.map(Duration::from_millis));
        builder.build()
    }
}

impl Default for DynamoConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        env::remove_var("DYNOKIT_MAX_ATTEMPTS");
        env::remove_var("DYNOKIT_RETRY_MODE");
        env::remove_var("DYNOKIT_OPERATION_TIMEOUT_MS");
        env::remove_var("DYNOKIT_CONNECT_TIMEOUT_MS");
        env::remove_var("DYNAMODB_TABLE_NAME");

        let config = DynamoConfig::from_env();

        assert_eq!(config.max_attempts, 10);
        assert_eq!(config.retry_mode, RetryMode::Adaptive);
        assert_eq!(config.operation_timeout_ms, None);
        assert_eq!(config.connect_timeout_ms, None);
        assert_eq!(config.table_name, "dynokit");
    }

    #[test]
    fn test_timeout_config_conversion() {
        let config = DynamoConfig {
            max_attempts: 3,
            retry_mode: RetryMode::Standard,
            operation_timeout_ms: Some(5_000),
            connect_timeout_ms: Some(1_000),
            table_name: "orders".to_string(),
        };

        let timeouts = config.timeout_config();
        assert_eq!(timeouts.operation_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(timeouts.connect_timeout(), Some(Duration::from_secs(1)));
    }
}
