//! Registry sharing one backend per identity.
use crate::{
    unit::{InitCallback, RegistryUnit, UnitStatus},
    Error, Result,
};
use futures::FutureExt;
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    fmt,
    ops::Deref,
    panic::AssertUnwindSafe,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Weak,
    },
};
use tokio::{runtime::Handle, sync::oneshot};
use wallet_backend::{BackendFactory, BoxedBackend, WalletBackend};
use wallet_core::{
    codes, BackendError, BackendKind, Identity, IdentityHash, InitOutcome,
};

/// Backend shared by every holder of the same identity.
///
/// Dropping the last strong reference runs the release hook
/// which removes the registry entry.
pub(crate) struct SharedBackend {
    identity: Identity,
    hash: IdentityHash,
    generation: u64,
    backend: BoxedBackend,
    registry: Weak<Inner>,
}

impl Drop for SharedBackend {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            inner.release(&self.hash, self.generation);
        }
    }
}

/// Strong reference to a shared backend.
///
/// Cloning is cheap; the backend lives until the last
/// handle is dropped.
#[derive(Clone)]
pub struct BackendHandle(Arc<SharedBackend>);

impl BackendHandle {
    /// Identity this backend was created for.
    pub fn identity(&self) -> &Identity {
        &self.0.identity
    }

    /// Hash of the identity.
    pub fn identity_hash(&self) -> &IdentityHash {
        &self.0.hash
    }

    /// Determine if two handles refer to the same backend.
    pub fn ptr_eq(&self, other: &BackendHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Number of live handles to this backend.
    pub fn holders(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

impl Deref for BackendHandle {
    type Target = dyn WalletBackend;

    fn deref(&self) -> &Self::Target {
        self.0.backend.as_ref()
    }
}

impl fmt::Debug for BackendHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendHandle")
            .field("identity", &self.0.identity)
            .field("hash", &self.0.hash)
            .field("generation", &self.0.generation)
            .finish()
    }
}

#[derive(Default)]
struct RegistryState {
    units: HashMap<IdentityHash, RegistryUnit>,
    closed: bool,
}

pub(crate) struct Inner {
    state: Mutex<RegistryState>,
    factory: Box<dyn BackendFactory>,
    runtime: Handle,
    generation: AtomicU64,
}

impl Inner {
    fn start(&self, hash: &IdentityHash, generation: u64) {
        let mut state = self.state.lock();
        if let Some(unit) = state.units.get_mut(hash) {
            if unit.generation() == generation {
                unit.start();
            }
        }
    }

    fn complete(
        &self,
        hash: &IdentityHash,
        generation: u64,
        outcome: &InitOutcome,
    ) -> Vec<InitCallback> {
        let mut state = self.state.lock();
        match state.units.get_mut(hash) {
            Some(unit) if unit.generation() == generation => {
                let callbacks = unit.finish(outcome);
                tracing::debug!(
                    identity = %hash,
                    success = outcome.is_ok(),
                    callbacks = callbacks.len(),
                    "registry::complete",
                );
                callbacks
            }
            _ => {
                tracing::debug!(
                    identity = %hash,
                    generation = generation,
                    "registry::complete::detached",
                );
                Vec::new()
            }
        }
    }

    fn release(&self, hash: &IdentityHash, generation: u64) {
        let mut state = self.state.lock();
        let current = state
            .units
            .get(hash)
            .map(|unit| unit.generation() == generation)
            .unwrap_or(false);
        if current {
            let unit = state.units.remove(hash);
            drop(state);
            tracing::debug!(identity = %hash, "registry::release");
            drop(unit);
        }
    }
}

/// Registry producing, sharing and initializing wallet backends.
///
/// At most one unit exists per identity. Concurrent requests for
/// the same identity observe a single initialization and each
/// receives the outcome exactly once. The registry keeps only a
/// weak reference to each backend so an entry is reclaimed as soon
/// as the last [`BackendHandle`] is dropped.
///
/// Cloning the registry yields another reference to the same map.
#[derive(Clone)]
pub struct BackendRegistry {
    inner: Arc<Inner>,
}

impl BackendRegistry {
    /// Create a registry that runs initialization on the
    /// current tokio runtime.
    pub fn new(factory: impl BackendFactory) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;
        Ok(Self::with_runtime(factory, runtime))
    }

    /// Create a registry that runs initialization on a runtime.
    pub fn with_runtime(factory: impl BackendFactory, runtime: Handle) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(Default::default()),
                factory: Box::new(factory),
                runtime,
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Acquire the shared backend for a kind and source.
    ///
    /// When the identity has a terminal outcome `on_complete` is
    /// invoked before this function returns. When initialization
    /// is still pending the callback is queued and invoked, in
    /// registration order, once the outcome is known. Otherwise a
    /// backend is created and its initialization started.
    ///
    /// Returns `None` without invoking `on_complete` when the
    /// factory does not support `kind` or the registry was torn down.
    pub fn acquire<F>(
        &self,
        kind: BackendKind,
        source: impl Into<String>,
        on_complete: F,
    ) -> Option<BackendHandle>
    where
        F: FnOnce(InitOutcome) + Send + 'static,
    {
        let identity = Identity::new(kind, source);
        let hash = identity.hash();

        let mut state = self.inner.state.lock();
        if state.closed {
            drop(state);
            tracing::warn!(identity = %hash, "registry::acquire::closed");
            return None;
        }

        if let Some(unit) = state.units.get_mut(&hash) {
            if let Some(shared) = unit.backend().upgrade() {
                let handle = BackendHandle(shared);
                match unit.enqueue(Box::new(on_complete)) {
                    Ok(()) => {
                        drop(state);
                        tracing::trace!(
                            identity = %hash,
                            "registry::acquire::pending",
                        );
                    }
                    Err((callback, outcome)) => {
                        drop(state);
                        tracing::trace!(
                            identity = %hash,
                            "registry::acquire::terminal",
                        );
                        callback(outcome);
                    }
                }
                return Some(handle);
            }
            // The last holder is being dropped and the release
            // hook has not run yet, replace the unit
            tracing::debug!(identity = %hash, "registry::acquire::replace");
        }

        let Some(backend) = self.inner.factory.create(kind) else {
            let stale = state.units.remove(&hash);
            drop(state);
            drop(stale);
            tracing::debug!(
                identity = %hash,
                kind = %kind,
                "registry::acquire::unsupported",
            );
            return None;
        };

        let generation = self.inner.generation.fetch_add(1, Ordering::Relaxed);
        let shared = Arc::new(SharedBackend {
            identity: identity.clone(),
            hash,
            generation,
            backend,
            registry: Arc::downgrade(&self.inner),
        });
        let stale = state.units.insert(
            hash,
            RegistryUnit::new(
                identity.clone(),
                generation,
                Arc::downgrade(&shared),
                Box::new(on_complete),
            ),
        );
        drop(state);
        drop(stale);

        tracing::debug!(
            identity = %hash,
            kind = %kind,
            generation = generation,
            "registry::acquire::create",
        );

        self.spawn_initialize(identity, BackendHandle(shared.clone()));
        Some(BackendHandle(shared))
    }

    /// Acquire a backend and wait for initialization.
    pub async fn acquire_initialized(
        &self,
        kind: BackendKind,
        source: impl Into<String>,
    ) -> Result<BackendHandle> {
        let (tx, rx) = oneshot::channel();
        let handle = self
            .acquire(kind, source, move |outcome| {
                let _ = tx.send(outcome);
            })
            .ok_or_else(|| {
                if self.is_closed() {
                    Error::Closed
                } else {
                    Error::UnsupportedKind(kind)
                }
            })?;
        rx.await.map_err(|_| Error::Abandoned)??;
        Ok(handle)
    }

    /// Live backend for an identity.
    ///
    /// Never creates a backend.
    pub fn lookup(&self, hash: &IdentityHash) -> Option<BackendHandle> {
        let state = self.inner.state.lock();
        state
            .units
            .get(hash)
            .and_then(|unit| unit.backend().upgrade())
            .map(BackendHandle)
    }

    /// Live backend for the hex form of an identity hash.
    pub fn lookup_hex(&self, hash: &str) -> Result<Option<BackendHandle>> {
        let hash: IdentityHash = hash.parse()?;
        Ok(self.lookup(&hash))
    }

    /// Status of the unit for an identity.
    pub fn status(&self, hash: &IdentityHash) -> Option<UnitStatus> {
        let state = self.inner.state.lock();
        state.units.get(hash).map(|unit| unit.status())
    }

    /// Identities with a unit in the registry.
    pub fn identities(&self) -> Vec<Identity> {
        let state = self.inner.state.lock();
        state
            .units
            .values()
            .map(|unit| unit.identity().clone())
            .collect()
    }

    /// Remove a failed unit so the next request retries
    /// initialization.
    ///
    /// Returns `false` when the identity has no failed unit;
    /// pending and initialized units are never removed.
    pub fn invalidate(&self, hash: &IdentityHash) -> bool {
        let mut state = self.inner.state.lock();
        let failed = matches!(
            state.units.get(hash).map(|unit| unit.status()),
            Some(UnitStatus::Failed(_))
        );
        if failed {
            let unit = state.units.remove(hash);
            drop(state);
            drop(unit);
            tracing::debug!(identity = %hash, "registry::invalidate");
        }
        failed
    }

    /// Number of units in the registry.
    pub fn len(&self) -> usize {
        self.inner.state.lock().units.len()
    }

    /// Determine if the registry has no units.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Determine if the registry was torn down.
    pub fn is_closed(&self) -> bool {
        self.inner.state.lock().closed
    }

    /// Close the registry and remove all units.
    ///
    /// Callers still waiting on initialization receive a
    /// [`codes::REGISTRY_SHUTDOWN`] error; subsequent calls to
    /// [`BackendRegistry::acquire`] return `None`. Existing handles
    /// remain usable.
    pub fn teardown(&self) {
        let units = {
            let mut state = self.inner.state.lock();
            state.closed = true;
            std::mem::take(&mut state.units)
        };

        let total = units.len();
        let mut notified = 0;
        let error = BackendError::shutdown();
        for (_, mut unit) in units {
            for callback in unit.drain() {
                notified += 1;
                callback(Err(error.clone()));
            }
        }
        tracing::info!(
            units = total,
            notified = notified,
            "registry::teardown",
        );
    }

    fn spawn_initialize(&self, identity: Identity, handle: BackendHandle) {
        let mut task = InitTask {
            registry: Arc::downgrade(&self.inner),
            hash: *handle.identity_hash(),
            generation: handle.0.generation,
            handle: Some(handle),
        };
        self.inner.runtime.spawn(async move {
            let hash = task.hash;
            if let Some(inner) = task.registry.upgrade() {
                inner.start(&hash, task.generation);
            }
            let Some(backend) = task.handle.as_ref() else {
                return;
            };

            let outcome = AssertUnwindSafe(backend.initialize(identity.source()))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| {
                    tracing::error!(
                        identity = %hash,
                        "registry::initialize::panic",
                    );
                    Err(BackendError::new(
                        codes::BACKEND_PANICKED,
                        "backend panicked during initialization",
                    ))
                });
            task.finish(outcome);
        });
    }
}

/// State owned by a spawned initialization.
///
/// Dropping it before [`InitTask::finish`] runs, as happens when
/// the runtime shuts down, fails the unit with
/// [`codes::REGISTRY_SHUTDOWN`].
struct InitTask {
    registry: Weak<Inner>,
    hash: IdentityHash,
    generation: u64,
    handle: Option<BackendHandle>,
}

impl InitTask {
    fn finish(&mut self, outcome: InitOutcome) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        let callbacks = match self.registry.upgrade() {
            Some(inner) => inner.complete(&self.hash, self.generation, &outcome),
            None => Vec::new(),
        };

        // Only external holders keep the backend alive
        // once callers are notified
        drop(handle);
        for callback in callbacks {
            callback(outcome.clone());
        }
    }
}

impl Drop for InitTask {
    fn drop(&mut self) {
        if self.handle.is_some() {
            tracing::warn!(
                identity = %self.hash,
                "registry::initialize::cancelled",
            );
            self.finish(Err(BackendError::shutdown()));
        }
    }
}
