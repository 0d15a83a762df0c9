//! Console configuration
//!
//! Loaded from a TOML file. Every section has defaults, so a missing file
//! or a partial one yields working values for the appliance.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub ui: UiConfig,
    pub daemon: DaemonConfig,
    pub payment: PaymentConfig,
    pub signals: SignalsConfig,
    pub control: ControlConfig,
    pub settings: SettingsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    /// Log file; the terminal belongs to the UI
    pub log_file: PathBuf,
    /// Clock tick in milliseconds
    pub tick_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from("sshui.log"),
            tick_ms: 1000,
        }
    }
}

/// Daemon JSON-RPC poller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DaemonConfig {
    pub url: String,
    pub interval_secs: u64,
    pub timeout_secs: u64,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:18081/json_rpc".to_string(),
            interval_secs: 5,
            timeout_secs: 3,
        }
    }
}

/// Payment service health poller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PaymentConfig {
    pub enabled: bool,
    pub url: String,
    pub interval_secs: u64,
    pub timeout_secs: u64,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "http://127.0.0.1:5000".to_string(),
            interval_secs: 5,
            timeout_secs: 5,
        }
    }
}

/// System bus listener
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SignalsConfig {
    pub enabled: bool,
    /// Bus monitor program
    pub monitor: String,
    pub interface: String,
    pub object_path: String,
    pub reconnect_secs: u64,
    pub max_reconnect_secs: u64,
}

impl Default for SignalsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            monitor: "dbus-monitor".to_string(),
            interface: "com.moneronodo.embeddedInterface".to_string(),
            object_path: "/com/monero/nodo".to_string(),
            reconnect_secs: 1,
            max_reconnect_secs: 60,
        }
    }
}

/// Service control programs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControlConfig {
    pub systemctl: PathBuf,
    pub dbus_send: PathBuf,
    /// Bus name the control methods are sent to
    pub destination: String,
    pub timeout_secs: u64,
    /// Service restarted after settings are saved
    pub restart_on_save: String,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            systemctl: PathBuf::from("/usr/bin/systemctl"),
            dbus_send: PathBuf::from("dbus-send"),
            destination: "com.monero.nodo".to_string(),
            timeout_secs: 5,
            restart_on_save: "monerod".to_string(),
        }
    }
}

/// Persisted node settings document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SettingsConfig {
    pub path: PathBuf,
    pub backup: PathBuf,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("config.json"),
            backup: PathBuf::from("config.json.bak"),
        }
    }
}

impl DaemonConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl PaymentConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, else the default location; a missing default
    /// file yields the compiled defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                debug!("No configuration file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// `<config_dir>/sshui/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "moneronodo", "sshui")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ui.tick_ms < 100 {
            return Err(ConfigError::ValidationError(
                "ui: tick_ms must be at least 100".to_string(),
            ));
        }

        validate_url("daemon", &self.daemon.url)?;
        validate_poll("daemon", self.daemon.interval_secs, self.daemon.timeout_secs)?;

        if self.payment.enabled {
            validate_url("payment", &self.payment.url)?;
            validate_poll(
                "payment",
                self.payment.interval_secs,
                self.payment.timeout_secs,
            )?;
        }

        if self.signals.enabled {
            if self.signals.monitor.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "signals: monitor program must be set".to_string(),
                ));
            }
            if self.signals.reconnect_secs == 0
                || self.signals.max_reconnect_secs < self.signals.reconnect_secs
            {
                return Err(ConfigError::ValidationError(
                    "signals: reconnect_secs must be at least 1 and not above max_reconnect_secs"
                        .to_string(),
                ));
            }
        }

        if !(1..=30).contains(&self.control.timeout_secs) {
            return Err(ConfigError::ValidationError(
                "control: timeout_secs must be between 1 and 30".to_string(),
            ));
        }

        Ok(())
    }
}

fn validate_url(name: &str, url: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!(
            "{}: url must be an http(s) URL, got '{}'",
            name, url
        )))
    }
}

fn validate_poll(name: &str, interval_secs: u64, timeout_secs: u64) -> Result<(), ConfigError> {
    if interval_secs < 1 {
        return Err(ConfigError::ValidationError(format!(
            "{}: interval must be at least 1 second",
            name
        )));
    }
    if !(1..=30).contains(&timeout_secs) {
        return Err(ConfigError::ValidationError(format!(
            "{}: timeout must be between 1 and 30 seconds",
            name
        )));
    }
    if timeout_secs >= interval_secs {
        return Err(ConfigError::ValidationError(format!(
            "{}: timeout must be shorter than the interval",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config() {
        let config = AppConfig::from_toml(
            r#"
            [daemon]
            url = "http://10.0.0.2:18081/json_rpc"

            [payment]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(config.daemon.url, "http://10.0.0.2:18081/json_rpc");
        assert_eq!(config.daemon.interval_secs, 5);
        assert!(!config.payment.enabled);
        assert_eq!(config.control.restart_on_save, "monerod");
    }

    #[test]
    fn test_timeout_must_be_below_interval() {
        let result = AppConfig::from_toml(
            r#"
            [daemon]
            interval_secs = 3
            timeout_secs = 3
            "#,
        );
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_rejects_non_http_url() {
        let result = AppConfig::from_toml(
            r#"
            [daemon]
            url = "127.0.0.1:18081"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_disabled_payment_skips_validation() {
        let result = AppConfig::from_toml(
            r#"
            [payment]
            enabled = false
            url = ""
            "#,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui]\ntick_ms = 500\n").unwrap();
        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.ui.tick_ms, 500);
    }
}
