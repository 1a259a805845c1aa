use thiserror::Error;

/// Errors generated by the backend library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error generated when a configured mnemonic length is
    /// not a multiple of three or is zero.
    #[error("mnemonic word count {0} is not a positive multiple of three")]
    InvalidWordCount(usize),

    /// Error generated when no mnemonic lengths are configured.
    #[error("at least one mnemonic word count must be configured")]
    NoWordCounts,
}
