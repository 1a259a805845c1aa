use thiserror::Error;

/// Errors generated by the core library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error generated when an identity hash has the wrong length.
    #[error("identity hash must be {0} bytes but got {1}")]
    IdentityHashLength(usize, usize),

    /// Error generated when a backend kind name is not recognized.
    #[error("unknown backend kind '{0}'")]
    UnknownKind(String),

    /// Error generated decoding hex.
    #[error(transparent)]
    Hex(#[from] hex::FromHexError),
}
