//! Configuration file for hosts embedding the registry.
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use wallet_backend::{LocalKeysConfig, StandardFactory};
use wallet_logs::{Logger, DEFAULT_LOG_LEVEL};

/// Wallet configuration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Logging configuration.
    pub logs: LogConfig,

    /// Configuration for the local keys backend.
    pub local_keys: LocalKeysConfig,

    /// Path the file was loaded from used to determine
    /// relative paths.
    #[serde(skip)]
    file: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter used when `RUST_LOG` is not set.
    pub level: String,

    /// Directory for log files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,

    /// Emit JSON lines on the console.
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_owned(),
            directory: None,
            json: false,
        }
    }
}

impl WalletConfig {
    /// Load a configuration file.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !tokio::fs::try_exists(path).await? {
            return Err(Error::NotFile(path.to_path_buf()));
        }

        let contents = tokio::fs::read_to_string(path).await?;
        let mut config: WalletConfig = toml::from_str(&contents)?;
        config.local_keys.validate()?;
        config.file = Some(tokio::fs::canonicalize(path).await?);

        if let Some(dir) = config.directory() {
            if let Some(logs) = config.logs.directory.as_mut() {
                if logs.is_relative() {
                    *logs = dir.join(&*logs);
                }
            }
        }

        tracing::debug!(path = %path.display(), "config::load");
        Ok(config)
    }

    /// Path the configuration was loaded from.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Factory for the built-in backends.
    pub fn factory(&self) -> StandardFactory {
        StandardFactory::new(self.local_keys.clone())
    }

    /// Logger for the configured log directory.
    pub fn logger(&self) -> Logger {
        Logger::new(self.logs.directory.clone()).with_json(self.logs.json)
    }

    /// Install the configured tracing subscriber.
    pub fn init_logs(&self) -> Result<()> {
        self.logger()
            .init_subscriber(Some(self.logs.level.clone()))?;
        Ok(())
    }

    /// Parent directory of the configuration file.
    fn directory(&self) -> Option<PathBuf> {
        self.file
            .as_ref()
            .and_then(|p| p.parent())
            .map(|p| p.to_path_buf())
    }
}
