//! Well-known error codes carried by [`BackendError`](crate::BackendError).
//!
//! Codes below 100 are reported by backend implementations,
//! codes from 100 are reported by the registry itself.

/// The source identifier does not name a usable key store.
pub const SOURCE_NOT_FOUND: i32 = 1;

/// The backend has already been initialized.
pub const ALREADY_INITIALIZED: i32 = 2;

/// An operation was attempted before initialization completed.
pub const NOT_INITIALIZED: i32 = 3;

/// Mnemonic words are malformed or have an unsupported length.
pub const INVALID_MNEMONIC: i32 = 4;

/// The public key is not held by the backend.
pub const KEY_NOT_FOUND: i32 = 5;

/// The key being imported is already held by the backend.
pub const DUPLICATE_KEY: i32 = 6;

/// The registry was torn down before initialization completed.
pub const REGISTRY_SHUTDOWN: i32 = 100;

/// The backend panicked while initializing.
pub const BACKEND_PANICKED: i32 = 101;
