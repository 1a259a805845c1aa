//! Core types for wallet backends and the backend registry.
//!
//! A wallet session is identified by the pair of a [`BackendKind`]
//! and a source identifier (typically a path to a key store).
//! The [`identity`] function derives a stable [`IdentityHash`]
//! from that pair which the registry uses as its map key.
#![deny(missing_docs)]
#![forbid(unsafe_code)]
#![cfg_attr(all(doc, CHANNEL_NIGHTLY), feature(doc_auto_cfg))]

pub mod codes;
mod error;
mod identity;
mod kind;
mod outcome;

pub use error::Error;
pub use identity::{identity, Identity, IdentityHash};
pub use kind::{BackendKind, UnknownKind};
pub use outcome::{BackendError, InitOutcome};

/// Result type for the library.
pub(crate) type Result<T> = std::result::Result<T, Error>;
