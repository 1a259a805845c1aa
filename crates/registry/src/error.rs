use std::path::PathBuf;
use thiserror::Error;
use wallet_core::{BackendError, BackendKind};

/// Errors generated by the registry library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error generated when a registry is created outside
    /// of a tokio runtime.
    #[error("backend registry must be created within a tokio runtime")]
    NoRuntime,

    /// Error generated when the factory cannot create a
    /// backend for a kind.
    #[error("backend kind {0} is not supported")]
    UnsupportedKind(BackendKind),

    /// Error generated when the process-wide registry
    /// has not been installed.
    #[error("process-wide backend registry is not initialized")]
    NoRegistry,

    /// Error generated when the registry has been torn down.
    #[error("backend registry is closed")]
    Closed,

    /// Error generated when an initialization completion
    /// was dropped without being invoked.
    #[error("backend initialization was abandoned")]
    Abandoned,

    /// Error generated when a file is expected.
    #[error("path {0} is not a file")]
    NotFile(PathBuf),

    /// Error generated when a backend fails to initialize.
    #[error(transparent)]
    Initialize(#[from] BackendError),

    /// Errors generated by the core library.
    #[error(transparent)]
    Core(#[from] wallet_core::Error),

    /// Errors generated by the backend library.
    #[error(transparent)]
    Backend(#[from] wallet_backend::Error),

    /// Errors generated by the logs library.
    #[error(transparent)]
    Logs(#[from] wallet_logs::Error),

    /// Errors generated by the IO module.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Error generated deserializing from TOML.
    #[error(transparent)]
    TomlDeser(#[from] toml::de::Error),

    /// Error generated serializing to TOML.
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}
