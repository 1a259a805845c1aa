use crate::{Error, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
    Registry,
};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_LEVEL: &str = "wallet=info";

const LOG_FILE_NAME: &str = "wallet.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Log files on disc.
#[derive(Debug, Default)]
pub struct LogFileStatus {
    /// Most recent log file.
    pub current: Option<PathBuf>,
    /// All log files, oldest first.
    pub files: Vec<PathBuf>,
    /// Total size of all log files in bytes.
    pub total_size: u64,
}

/// Installs tracing subscribers.
///
/// Console output omits timestamps; when a log directory is
/// configured output is also written to a daily rolling file.
#[derive(Debug, Clone)]
pub struct Logger {
    log_dir: Option<PathBuf>,
    json: bool,
}

impl Logger {
    /// Create a logger.
    pub fn new(log_dir: Option<PathBuf>) -> Self {
        Self {
            log_dir,
            json: false,
        }
    }

    /// Emit JSON lines on the console.
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Log directory.
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }

    /// Install a subscriber writing to the console and, when a
    /// log directory is configured, to the log file.
    pub fn init_subscriber(
        &self,
        default_log_level: Option<String>,
    ) -> Result<()> {
        let console: BoxedLayer = if self.json {
            tracing_subscriber::fmt::layer().json().boxed()
        } else {
            tracing_subscriber::fmt::layer().without_time().boxed()
        };

        let mut layers = vec![console];
        if let Some(file) = self.file_layer()? {
            layers.push(file);
        }

        tracing_subscriber::registry()
            .with(layers)
            .with(self.filter(default_log_level))
            .try_init()?;
        tracing::debug!(
            log_dir = ?self.log_dir,
            json = self.json,
            "logs::init_subscriber",
        );
        Ok(())
    }

    /// Install a subscriber that only writes to the log file.
    ///
    /// Used when stdout is reserved for another protocol.
    pub fn init_file_subscriber(
        &self,
        default_log_level: Option<String>,
    ) -> Result<()> {
        let file = self.file_layer()?.ok_or(Error::NoLogDirectory)?;
        tracing_subscriber::registry()
            .with(file)
            .with(self.filter(default_log_level))
            .try_init()?;
        tracing::debug!(log_dir = ?self.log_dir, "logs::init_file_subscriber");
        Ok(())
    }

    /// Inspect the log files on disc.
    pub fn log_file_status(&self) -> Result<LogFileStatus> {
        let log_dir = self.log_dir.as_ref().ok_or(Error::NoLogDirectory)?;
        let mut status = LogFileStatus::default();
        if !log_dir.exists() {
            return Ok(status);
        }

        for entry in fs::read_dir(log_dir)? {
            let entry = entry?;
            let name = entry.file_name();
            if name.to_string_lossy().starts_with(LOG_FILE_NAME) {
                status.total_size += entry.metadata()?.len();
                status.files.push(entry.path());
            }
        }
        // Rotated names end with the date so lexical order is
        // chronological order
        status.files.sort();
        status.current = status.files.last().cloned();
        Ok(status)
    }

    fn filter(&self, default_log_level: Option<String>) -> EnvFilter {
        EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            default_log_level.unwrap_or_else(|| DEFAULT_LOG_LEVEL.into())
        }))
    }

    fn file_layer(&self) -> Result<Option<BoxedLayer>> {
        let Some(log_dir) = &self.log_dir else {
            return Ok(None);
        };
        fs::create_dir_all(log_dir)?;
        let appender =
            RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_NAME);
        Ok(Some(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(appender)
                .boxed(),
        ))
    }
}
