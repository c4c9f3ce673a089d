//! Configuration management for the MCP server.
//!
//! Values come from defaults, overridden by `MCP_*` environment variables
//! (a `.env` file is loaded first when present).

use super::transport::TransportConfig;
use crate::domains::tools::ToolEnvironment;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{info, warn};

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Tool execution configuration.
    pub tools: ToolsConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Configuration for tool execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Fixed seed for the random source handed to tools.
    /// Unset means every call draws fresh entropy.
    pub seed: Option<u64>,
}

impl ToolsConfig {
    /// The environment tool calls run in: wall clock plus the configured seed.
    pub fn environment(&self) -> ToolEnvironment {
        ToolEnvironment::system().with_seed(self.seed)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "Utility Toolbox MCP Server".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_timestamps: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            transport: TransportConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

/// Read and parse an environment variable.
///
/// Unset yields `None`; a value that fails to parse is reported and ignored.
pub(crate) fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}

/// Read a boolean flag; anything but `false`/`0` counts as enabled.
pub(crate) fn env_flag(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .map(|v| v.to_lowercase() != "false" && v != "0")
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`.
    ///
    /// Unparsable values are reported through `tracing`, so install the
    /// subscriber (from [`LoggingConfig::from_env`]) before calling this.
    pub fn from_env() -> Self {
        let mut config = Self {
            logging: LoggingConfig::from_env(),
            ..Self::default()
        };

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(version) = std::env::var("MCP_SERVER_VERSION") {
            config.server.version = version;
        }

        config.transport = TransportConfig::from_env();

        config.tools.seed = env_parse("MCP_TOOLS_SEED");
        if let Some(seed) = config.tools.seed {
            info!("Tool RNG seeded with {}: random tools are reproducible", seed);
        }

        config
    }
}

impl LoggingConfig {
    /// Read the logging settings alone.
    ///
    /// Loaded before the subscriber exists, so it must not log itself.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut logging = Self::default();
        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            logging.level = level;
        }
        if let Some(with_timestamps) = env_flag("MCP_LOG_TIMESTAMPS") {
            logging.with_timestamps = with_timestamps;
        }
        logging
    }
}

/// Serializes tests that mutate process environment variables.
#[cfg(test)]
pub(crate) static ENV_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;

    fn clear_env() {
        for key in [
            "MCP_SERVER_NAME",
            "MCP_SERVER_VERSION",
            "MCP_LOG_LEVEL",
            "MCP_LOG_TIMESTAMPS",
            "MCP_TOOLS_SEED",
            "MCP_TRANSPORT",
        ] {
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.name, "Utility Toolbox MCP Server");
        assert_eq!(config.server.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(config.logging.level, "info");
        assert!(config.tools.seed.is_none());
    }

    #[test]
    fn test_server_overrides_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_env();
        unsafe {
            std::env::set_var("MCP_SERVER_NAME", "toolbox-test");
            std::env::set_var("MCP_LOG_LEVEL", "debug");
        }
        let config = Config::from_env();
        assert_eq!(config.server.name, "toolbox-test");
        assert_eq!(config.logging.level, "debug");
        clear_env();
    }

    #[test]
    fn test_logging_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_env();
        unsafe {
            std::env::set_var("MCP_LOG_LEVEL", "warn");
            std::env::set_var("MCP_LOG_TIMESTAMPS", "false");
            std::env::set_var("MCP_TOOLS_SEED", "not-a-number");
        }
        let logging = LoggingConfig::from_env();
        assert_eq!(logging.level, "warn");
        assert!(!logging.with_timestamps);

        let config = Config::from_env();
        assert_eq!(config.logging.level, logging.level);
        assert_eq!(config.logging.with_timestamps, logging.with_timestamps);
        clear_env();
    }

    #[test]
    fn test_seed_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_env();
        unsafe {
            std::env::set_var("MCP_TOOLS_SEED", "1234");
        }
        let config = Config::from_env();
        assert_eq!(config.tools.seed, Some(1234));
        assert_eq!(config.tools.environment().seed(), Some(1234));
        clear_env();
    }

    #[test]
    fn test_invalid_seed_falls_back() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_env();
        unsafe {
            std::env::set_var("MCP_TOOLS_SEED", "not-a-number");
        }
        let config = Config::from_env();
        assert!(config.tools.seed.is_none());
        clear_env();
    }

    #[test]
    fn test_config_serializes() {
        let json = serde_json::to_value(Config::default()).unwrap();
        assert_eq!(json["server"]["name"], "Utility Toolbox MCP Server");
        assert!(json["tools"]["seed"].is_null());
    }
}
