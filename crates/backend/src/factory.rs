//! Construct backends by kind.
use crate::{BoxedBackend, LocalKeysBackend, LocalKeysConfig};
use wallet_core::BackendKind;

/// Creates fresh, uninitialized backends.
pub trait BackendFactory: Send + Sync + 'static {
    /// Create a backend for a kind.
    ///
    /// Returns `None` when the kind is not available; the
    /// returned backend must not begin initializing on its own.
    fn create(&self, kind: BackendKind) -> Option<BoxedBackend>;
}

/// Factory for the backends built into this library.
#[derive(Debug, Clone, Default)]
pub struct StandardFactory {
    local_keys: LocalKeysConfig,
}

impl StandardFactory {
    /// Create a factory.
    pub fn new(local_keys: LocalKeysConfig) -> Self {
        Self { local_keys }
    }
}

impl BackendFactory for StandardFactory {
    fn create(&self, kind: BackendKind) -> Option<BoxedBackend> {
        match kind {
            BackendKind::LocalKeys => Some(Box::new(LocalKeysBackend::new(
                self.local_keys.clone(),
            ))),
            BackendKind::Unsupported(code) => {
                tracing::debug!(code = %code, "factory::unsupported_kind");
                None
            }
        }
    }
}

impl<F> BackendFactory for F
where
    F: Fn(BackendKind) -> Option<BoxedBackend> + Send + Sync + 'static,
{
    fn create(&self, kind: BackendKind) -> Option<BoxedBackend> {
        (self)(kind)
    }
}
