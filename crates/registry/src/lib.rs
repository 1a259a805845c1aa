//! Registry producing, sharing and initializing wallet backends.
//!
//! Callers ask the [`BackendRegistry`] for a backend by kind and
//! source identifier. Requests for the same identity share one
//! backend and one initialization; every caller is notified of the
//! outcome exactly once. A [`WalletSession`] binds a mutable identity
//! to the registry and publishes its status to observers.
//!
//! ```no_run
//! use wallet_registry::{BackendKind, BackendRegistry, StandardFactory};
//!
//! # async fn run() -> wallet_registry::Result<()> {
//! let registry = BackendRegistry::new(StandardFactory::default())?;
//! let backend = registry
//!     .acquire_initialized(BackendKind::LocalKeys, "/path/to/keys")
//!     .await?;
//! let public_key = backend.create_new_key().await?;
//! # Ok(())
//! # }
//! ```
#![deny(missing_docs)]
#![forbid(unsafe_code)]
#![cfg_attr(all(doc, CHANNEL_NIGHTLY), feature(doc_auto_cfg))]

mod config;
mod error;
mod global;
mod registry;
mod session;
mod unit;

pub use config::{LogConfig, WalletConfig};
pub use error::Error;
pub use global::{init_registry, registry, teardown_registry};
pub use registry::{BackendHandle, BackendRegistry};
pub use session::{SessionStatus, WalletSession};
pub use unit::UnitStatus;

pub use wallet_backend::{
    secrecy, BackendFactory, BoxedBackend, LocalKeysBackend, LocalKeysConfig,
    StandardFactory, WalletBackend,
};
pub use wallet_core::{
    codes, identity, BackendError, BackendKind, Identity, IdentityHash,
    InitOutcome, UnknownKind,
};

/// Result type for the registry library.
pub type Result<T> = std::result::Result<T, Error>;
