//! Binding from a mutable identity to a shared backend.
use crate::{global, registry::BackendHandle, BackendRegistry, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use wallet_core::{BackendError, BackendKind, Identity, IdentityHash, InitOutcome};

/// Observable status of a session.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct SessionStatus {
    /// Identity the status describes.
    pub identity: Option<IdentityHash>,
    /// Whether the backend finished initializing successfully.
    pub initialized: bool,
    /// Whether initialization is in progress.
    pub initializing: bool,
    /// Initialization error.
    pub error: Option<BackendError>,
}

impl SessionStatus {
    /// Error code, zero when there is no error.
    pub fn error_code(&self) -> i32 {
        self.error.as_ref().map(|e| e.code()).unwrap_or(0)
    }

    /// Error message, empty when there is no error.
    pub fn error_message(&self) -> &str {
        self.error.as_ref().map(|e| e.message()).unwrap_or("")
    }
}

#[derive(Default)]
struct Binding {
    kind: Option<BackendKind>,
    source: String,
    backend: Option<BackendHandle>,
}

impl Binding {
    fn identity(&self) -> Option<Identity> {
        match self.kind {
            Some(kind) if !self.source.is_empty() => {
                Some(Identity::new(kind, self.source.clone()))
            }
            _ => None,
        }
    }
}

/// Session bound to the backend for the current kind and source.
///
/// Changing the kind or source re-resolves the backend through
/// the registry. Completions for an identity the session has
/// since moved away from never touch the published status.
pub struct WalletSession {
    registry: BackendRegistry,
    binding: Mutex<Binding>,
    status: Arc<watch::Sender<SessionStatus>>,
}

impl WalletSession {
    /// Create an unbound session.
    pub fn new(registry: BackendRegistry) -> Self {
        let (status, _) = watch::channel(SessionStatus::default());
        Self {
            registry,
            binding: Mutex::new(Default::default()),
            status: Arc::new(status),
        }
    }

    /// Create a session on the process-wide registry.
    pub fn global() -> Result<Self> {
        Ok(Self::new(global::registry()?.clone()))
    }

    /// Backend kind.
    pub fn kind(&self) -> Option<BackendKind> {
        self.binding.lock().kind
    }

    /// Source identifier.
    pub fn source(&self) -> String {
        self.binding.lock().source.clone()
    }

    /// Set the backend kind.
    ///
    /// Reloads and returns `true` only when the kind changed.
    pub fn set_kind(&self, kind: BackendKind) -> bool {
        {
            let mut binding = self.binding.lock();
            if binding.kind == Some(kind) {
                return false;
            }
            binding.kind = Some(kind);
        }
        self.reload();
        true
    }

    /// Set the source identifier.
    ///
    /// Reloads and returns `true` only when the source changed.
    pub fn set_source(&self, source: impl Into<String>) -> bool {
        let source = source.into();
        {
            let mut binding = self.binding.lock();
            if binding.source == source {
                return false;
            }
            binding.source = source;
        }
        self.reload();
        true
    }

    /// Current backend.
    pub fn backend(&self) -> Option<BackendHandle> {
        self.binding.lock().backend.clone()
    }

    /// Current status.
    pub fn status(&self) -> SessionStatus {
        self.status.borrow().clone()
    }

    /// Receive status changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    /// Release the current backend and request the backend
    /// for the current kind and source.
    pub fn reload(&self) {
        let (identity, previous) = {
            let mut binding = self.binding.lock();
            let previous = binding.backend.take();
            let identity = binding.identity();
            self.status.send_replace(SessionStatus {
                identity: identity.as_ref().map(|i| i.hash()),
                initializing: identity.is_some(),
                ..Default::default()
            });
            (identity, previous)
        };
        drop(previous);

        let Some(identity) = identity else {
            tracing::debug!("session::reload::unbound");
            return;
        };

        let hash = identity.hash();
        let status = Arc::downgrade(&self.status);
        let backend = self.registry.acquire(
            identity.kind(),
            identity.source(),
            move |outcome| {
                if let Some(status) = status.upgrade() {
                    apply_outcome(&status, &hash, outcome);
                }
            },
        );

        let Some(backend) = backend else {
            self.status.send_if_modified(|current| {
                if current.identity == Some(hash) && current.initializing {
                    current.initializing = false;
                    true
                } else {
                    false
                }
            });
            tracing::debug!(identity = %hash, "session::reload::unavailable");
            return;
        };

        let stale = {
            let mut binding = self.binding.lock();
            if binding.identity().map(|i| i.hash()) == Some(hash) {
                binding.backend.replace(backend)
            } else {
                Some(backend)
            }
        };
        drop(stale);
        tracing::debug!(identity = %hash, "session::reload");
    }
}

fn apply_outcome(
    status: &watch::Sender<SessionStatus>,
    hash: &IdentityHash,
    outcome: InitOutcome,
) {
    status.send_if_modified(|current| {
        if current.identity.as_ref() != Some(hash) {
            tracing::debug!(identity = %hash, "session::stale_outcome");
            return false;
        }
        current.initializing = false;
        match outcome {
            Ok(()) => {
                current.initialized = true;
                current.error = None;
            }
            Err(err) => {
                current.initialized = false;
                current.error = Some(err);
            }
        }
        true
    });
}
