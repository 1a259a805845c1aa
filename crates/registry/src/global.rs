//! Process-wide backend registry.
//!
//! The registry installed here lives for the remainder of the
//! process. Hosts call [`init_registry`] once at startup and may
//! call [`teardown_registry`] at shutdown to notify callers still
//! waiting on initialization; the closed registry stays installed
//! and refuses further requests.
//!
//! Initialization runs on the runtime the registry was created
//! with. Once that runtime shuts down, pending and new
//! initializations fail with
//! [`REGISTRY_SHUTDOWN`](wallet_core::codes::REGISTRY_SHUTDOWN),
//! so install a registry created on the runtime that lives for
//! the whole process.
use crate::{registry::BackendRegistry, Error, Result};
use std::sync::OnceLock;

static REGISTRY: OnceLock<BackendRegistry> = OnceLock::new();

/// Install the process-wide registry.
///
/// The first call wins; later calls return the registry that
/// is already installed.
pub fn init_registry(registry: BackendRegistry) -> &'static BackendRegistry {
    REGISTRY.get_or_init(|| {
        tracing::debug!("registry::init");
        registry
    })
}

/// Process-wide registry.
pub fn registry() -> Result<&'static BackendRegistry> {
    REGISTRY.get().ok_or(Error::NoRegistry)
}

/// Tear down the process-wide registry.
///
/// Returns `false` when no registry was installed.
pub fn teardown_registry() -> bool {
    match REGISTRY.get() {
        Some(registry) => {
            registry.teardown();
            true
        }
        None => false,
    }
}
