//! Wallet backend capability contract.
//!
//! A [`WalletBackend`] is constructed uninitialized by a
//! [`BackendFactory`], becomes initialized exactly once (or fails
//! exactly once) and thereafter answers key queries and performs
//! key mutations, each of which completes asynchronously.
#![deny(missing_docs)]
#![forbid(unsafe_code)]
#![cfg_attr(all(doc, CHANNEL_NIGHTLY), feature(doc_auto_cfg))]

mod backend;
mod error;
mod factory;
mod local_keys;

pub use backend::{BoxedBackend, WalletBackend};
pub use error::Error;
pub use factory::{BackendFactory, StandardFactory};
pub use local_keys::{LocalKeysBackend, LocalKeysConfig};

pub use secrecy;
pub use wallet_core::{BackendError, BackendKind};

/// Result type for the library.
pub(crate) type Result<T> = std::result::Result<T, Error>;
