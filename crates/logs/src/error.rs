use thiserror::Error;

/// Errors generated by the logs library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error generated when a file subscriber is requested
    /// without a log directory.
    #[error("no log directory configured")]
    NoLogDirectory,

    /// Error generated when a global subscriber is already installed.
    #[error(transparent)]
    Init(#[from] tracing_subscriber::util::TryInitError),

    /// Error generated by the file system.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
