//! Configuration loading for the publish gateway.
//!
//! Mirrors the original Go loader's permissive behaviour: unknown YAML keys
//! are ignored and every section has a sane default, so a near-empty config
//! file is valid.

mod error;

pub use error::Error;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fallback path used when no `--config` flag is supplied.
pub const DEFAULT_CONFIG_PATH: &str = "configs/config.yaml";

/// Top-level gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub region: String,
    pub env: String,
    pub log: LogConfig,
    pub nats: NatsConfig,
    pub valkey: ValkeyConfig,
    pub message: MessageConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: "local".to_string(),
            env: "dev".to_string(),
            log: LogConfig::default(),
            nats: NatsConfig::default(),
            valkey: ValkeyConfig::default(),
            message: MessageConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
        }
    }
}

/// Log levels accepted in configuration. `Fatal`/`Panic` have no direct
/// `tracing::Level` counterpart and are mapped onto `ERROR` by
/// `gateway-telemetry` (see DESIGN.md).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    Panic,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NatsConfig {
    pub url: String,
    #[serde(rename = "connPoolCount")]
    pub conn_pool_count: u32,
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            url: "nats://127.0.0.1:4222".to_string(),
            conn_pool_count: 3,
        }
    }
}

impl NatsConfig {
    /// Effective pool size: the Go original silently treats 0 as 3.
    pub fn pool_size(&self) -> u32 {
        if self.conn_pool_count == 0 {
            3
        } else {
            self.conn_pool_count
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ValkeyConfig {
    pub addr: String,
    pub password: Option<String>,
    pub db: i64,
}

impl Default for ValkeyConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:6379".to_string(),
            password: None,
            db: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MessageConfig {
    pub worker: u32,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self { worker: 1 }
    }
}

impl MessageConfig {
    /// Effective worker count: 0 means "use a single ack worker".
    pub fn worker_count(&self) -> u32 {
        if self.worker == 0 {
            1
        } else {
            self.worker
        }
    }
}

impl Config {
    /// Loads configuration from `path` if given, falling back to
    /// [`DEFAULT_CONFIG_PATH`] whenever the chosen path can't be read —
    /// whether because none was supplied or because the supplied one
    /// doesn't exist.
    pub fn load(path: Option<&Path>) -> Result<Config, Error> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) if path != Path::new(DEFAULT_CONFIG_PATH) => {
                std::fs::read_to_string(DEFAULT_CONFIG_PATH).map_err(|source| Error::Read {
                    path: DEFAULT_CONFIG_PATH.to_string(),
                    source,
                })?
            }
            Err(source) => {
                return Err(Error::Read {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        let config: Config = serde_yaml::from_str(&raw)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_fills_defaults_for_missing_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "region: us-east-1\nenv: prod").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.env, "prod");
        assert_eq!(config.nats.pool_size(), 3);
        assert_eq!(config.message.worker_count(), 1);
        assert_eq!(config.valkey.addr, "127.0.0.1:6379");
    }

    #[test]
    fn load_ignores_unknown_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "region: us-east-1\nsomeFutureField: 42").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.region, "us-east-1");
    }

    #[test]
    fn zero_pool_count_defaults_to_three() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "nats:\n  connPoolCount: 0").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.nats.pool_size(), 3);
    }

    #[test]
    fn missing_file_is_a_read_error_when_fallback_is_also_missing() {
        let dir = tempfile::tempdir().unwrap();
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();
        let err = Config::load(Some(Path::new("/nonexistent/config.yaml"))).unwrap_err();
        std::env::set_current_dir(original).unwrap();

        assert!(matches!(err, Error::Read { .. }));
    }

    #[test]
    fn missing_supplied_path_falls_back_to_default_config_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("configs")).unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_PATH),
            "region: fallback-region\n",
        )
        .unwrap();

        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();
        let result = Config::load(Some(Path::new("/nonexistent/config.yaml")));
        std::env::set_current_dir(original).unwrap();

        assert_eq!(result.unwrap().region, "fallback-region");
    }

    #[test]
    fn invalid_yaml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "region: [unterminated").unwrap();

        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}
