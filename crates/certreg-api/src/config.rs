//! # Service Configuration
//!
//! Loaded from a YAML file when `CERTREG_CONFIG` names one, otherwise from
//! individual environment variables:
//!
//! | Variable         | Meaning                                   | Default |
//! |------------------|-------------------------------------------|---------|
//! | `PORT`           | HTTP listen port                          | `8080`  |
//! | `AUTH_TOKEN`     | Static bearer token; unset disables auth  | unset   |
//! | `REGISTRY_OWNER` | Owner address of the registry (required)  |         |
//! | `LOG_FORMAT`     | `text` or `json`                          | `text`  |

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use certreg_core::Address;

/// Environment variable naming a YAML config file.
pub const CONFIG_PATH_ENV: &str = "CERTREG_CONFIG";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Invalid {
                key: "LOG_FORMAT",
                reason: format!("expected 'text' or 'json', got '{other}'"),
            }),
        }
    }
}

/// Errors loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required setting is absent.
    #[error("missing required setting {0}")]
    Missing(&'static str),

    /// A setting is present but unparseable.
    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    /// The config file could not be read.
    #[error("reading config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid YAML for [`AppConfig`].
    #[error("parsing config file {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

fn default_port() -> u16 {
    8080
}

/// Application configuration.
///
/// Custom `Debug` redacts the token value to prevent credential leakage in logs.
#[derive(Clone, Deserialize)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Static bearer token. If `None`, authentication is disabled.
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Registry owner, fixed for the lifetime of the process.
    pub owner: Address,
    /// Log output format.
    #[serde(default)]
    pub log_format: LogFormat,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("owner", &self.owner)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl AppConfig {
    /// Configuration with defaults for everything except the owner.
    pub fn new(owner: Address) -> Self {
        Self {
            port: default_port(),
            auth_token: None,
            owner,
            log_format: LogFormat::default(),
        }
    }

    /// Load from the file named by `CERTREG_CONFIG`, or from the environment.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_yaml_file(path.trim()),
            _ => Self::from_env(),
        }
    }

    /// Build from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let owner = lookup("REGISTRY_OWNER")
            .ok_or(ConfigError::Missing("REGISTRY_OWNER"))?
            .parse::<Address>()
            .map_err(|e| ConfigError::Invalid {
                key: "REGISTRY_OWNER",
                reason: e.to_string(),
            })?;

        let port = match lookup("PORT") {
            Some(p) => p.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                key: "PORT",
                reason: format!("{e}"),
            })?,
            None => default_port(),
        };

        let log_format = match lookup("LOG_FORMAT") {
            Some(f) => f.parse()?,
            None => LogFormat::default(),
        };

        Ok(Self {
            port,
            auth_token: lookup("AUTH_TOKEN").filter(|t| !t.is_empty()),
            owner,
            log_format,
        })
    }

    /// Parse a YAML config file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Yaml {
            path: display,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    const OWNER: &str = "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf";

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn env_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("REGISTRY_OWNER", OWNER)])).unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.auth_token.is_none());
        assert_eq!(config.owner.to_hex(), OWNER);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn env_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("REGISTRY_OWNER", OWNER),
            ("PORT", "9090"),
            ("AUTH_TOKEN", "s3cret"),
            ("LOG_FORMAT", "JSON"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.auth_token.as_deref(), Some("s3cret"));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn owner_required() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("REGISTRY_OWNER")));
    }

    #[test]
    fn bad_port_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("REGISTRY_OWNER", OWNER), ("PORT", "http")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }

    #[test]
    fn debug_redacts_token() {
        let mut config = AppConfig::new(Address([1; 20]));
        config.auth_token = Some("super-secret".into());
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port: 3000\nowner: \"{OWNER}\"\nlog_format: json").unwrap();

        let config = AppConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.owner.to_hex(), OWNER);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn yaml_missing_owner() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port: 3000").unwrap();
        assert!(matches!(
            AppConfig::from_yaml_file(file.path()),
            Err(ConfigError::Yaml { .. })
        ));
    }
}
