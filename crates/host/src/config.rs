//! Host configuration management

use crate::session::SessionOptions;
use anyhow::{Context, Result, anyhow};
use protocol::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostConfig {
    #[serde(default)]
    pub general: GeneralSettings,
    #[serde(default)]
    pub transfer: TransferSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    #[serde(default = "GeneralSettings::default_log_level")]
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: Self::default_log_level(),
        }
    }
}

impl GeneralSettings {
    fn default_log_level() -> String {
        "info".to_string()
    }
}

/// Control transfer timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferSettings {
    /// Timeout of each control transfer
    #[serde(default = "TransferSettings::default_timeout_ms")]
    pub timeout_ms: u64,
    /// Pause between the descriptor upload and the first event
    #[serde(default = "TransferSettings::default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Extra event send attempts when the device is not ready (0 = send once)
    #[serde(default)]
    pub event_retries: u32,
    /// Delay before the first retry, doubled for each further retry
    #[serde(default = "TransferSettings::default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            timeout_ms: Self::default_timeout_ms(),
            settle_delay_ms: Self::default_settle_delay_ms(),
            event_retries: 0,
            retry_backoff_ms: Self::default_retry_backoff_ms(),
        }
    }
}

impl TransferSettings {
    fn default_timeout_ms() -> u64 {
        1000
    }

    fn default_settle_delay_ms() -> u64 {
        100
    }

    fn default_retry_backoff_ms() -> u64 {
        50
    }
}

impl HostConfig {
    /// Load configuration from the specified path
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            expand_path(&p)
        } else {
            // Try standard locations in order
            let candidates = vec![
                Self::default_path(),
                PathBuf::from("/etc/aoa-hid/host.toml"),
            ];

            candidates
                .into_iter()
                .find(|p| p.exists())
                .ok_or_else(|| anyhow!("No configuration file found"))?
        };

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: HostConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        config.validate()?;

        tracing::debug!("Loaded configuration from: {}", config_path.display());
        Ok(config)
    }

    /// Load configuration or return defaults if not found
    pub fn load_or_default() -> Self {
        match Self::load(None) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("Failed to load config: {:#}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save configuration to the specified path
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!("Saved configuration to: {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("aoa-hid").join("host.toml")
        } else {
            PathBuf::from(".config/aoa-hid/host.toml")
        }
    }

    /// Session tunables derived from the transfer settings
    pub fn session_options(&self, unregister: bool) -> SessionOptions {
        let transfer = &self.transfer;
        let retry = if transfer.event_retries == 0 {
            RetryPolicy::none()
        } else {
            RetryPolicy::new(
                transfer.event_retries,
                Duration::from_millis(transfer.retry_backoff_ms),
            )
        };

        SessionOptions {
            timeout: Duration::from_millis(transfer.timeout_ms),
            settle_delay: Duration::from_millis(transfer.settle_delay_ms),
            retry,
            unregister,
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(anyhow!(
                "Invalid log level '{}', must be one of: {}",
                self.general.log_level,
                valid_levels.join(", ")
            ));
        }

        if self.transfer.timeout_ms == 0 {
            return Err(anyhow!("transfer.timeout_ms must be greater than 0"));
        }

        if self.transfer.event_retries > 0 && self.transfer.retry_backoff_ms == 0 {
            return Err(anyhow!(
                "transfer.retry_backoff_ms must be greater than 0 when event_retries is set"
            ));
        }

        Ok(())
    }
}

fn expand_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).as_ref()),
        None => path.to_path_buf(),
    }
}
