//! Per-identity bookkeeping owned by the registry.
use crate::registry::SharedBackend;
use std::sync::Weak;
use wallet_core::{BackendError, Identity, InitOutcome};

/// Completion callback registered by a caller of `acquire`.
pub(crate) type InitCallback = Box<dyn FnOnce(InitOutcome) + Send + 'static>;

/// Observable state of a registry unit.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum UnitStatus {
    /// Backend constructed, initialization not yet started.
    Creating,
    /// Waiting for the backend to finish initializing.
    Initializing,
    /// Backend initialized successfully.
    Initialized,
    /// Backend failed to initialize.
    Failed(BackendError),
}

impl UnitStatus {
    /// Determine if the outcome is known.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Initialized | Self::Failed(_))
    }
}

enum UnitState {
    Creating(Vec<InitCallback>),
    Initializing(Vec<InitCallback>),
    Initialized,
    Failed(BackendError),
}

/// Registry entry for one identity.
///
/// Callbacks are only appended while the unit is not terminal;
/// the transition to a terminal state hands every queued callback
/// back to the caller exactly once.
pub(crate) struct RegistryUnit {
    identity: Identity,
    generation: u64,
    backend: Weak<SharedBackend>,
    state: UnitState,
}

impl RegistryUnit {
    pub fn new(
        identity: Identity,
        generation: u64,
        backend: Weak<SharedBackend>,
        callback: InitCallback,
    ) -> Self {
        Self {
            identity,
            generation,
            backend,
            state: UnitState::Creating(vec![callback]),
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn backend(&self) -> &Weak<SharedBackend> {
        &self.backend
    }

    pub fn status(&self) -> UnitStatus {
        match &self.state {
            UnitState::Creating(_) => UnitStatus::Creating,
            UnitState::Initializing(_) => UnitStatus::Initializing,
            UnitState::Initialized => UnitStatus::Initialized,
            UnitState::Failed(err) => UnitStatus::Failed(err.clone()),
        }
    }

    /// Stored outcome once terminal.
    pub fn outcome(&self) -> Option<InitOutcome> {
        match &self.state {
            UnitState::Initialized => Some(Ok(())),
            UnitState::Failed(err) => Some(Err(err.clone())),
            _ => None,
        }
    }

    /// Queue a callback on a pending unit.
    ///
    /// Returns the callback with the stored outcome when the
    /// unit is already terminal.
    pub fn enqueue(
        &mut self,
        callback: InitCallback,
    ) -> Result<(), (InitCallback, InitOutcome)> {
        match &mut self.state {
            UnitState::Creating(callbacks)
            | UnitState::Initializing(callbacks) => {
                callbacks.push(callback);
                Ok(())
            }
            UnitState::Initialized => Err((callback, Ok(()))),
            UnitState::Failed(err) => Err((callback, Err(err.clone()))),
        }
    }

    /// Mark initialization as started.
    pub fn start(&mut self) {
        if let UnitState::Creating(callbacks) = &mut self.state {
            let callbacks = std::mem::take(callbacks);
            self.state = UnitState::Initializing(callbacks);
        }
    }

    /// Record the outcome and take the queued callbacks in
    /// registration order.
    ///
    /// A unit that is already terminal keeps its first outcome.
    pub fn finish(&mut self, outcome: &InitOutcome) -> Vec<InitCallback> {
        if self.outcome().is_some() {
            return Vec::new();
        }
        let terminal = match outcome {
            Ok(()) => UnitState::Initialized,
            Err(err) => UnitState::Failed(err.clone()),
        };
        match std::mem::replace(&mut self.state, terminal) {
            UnitState::Creating(callbacks)
            | UnitState::Initializing(callbacks) => callbacks,
            _ => Vec::new(),
        }
    }

    /// Take queued callbacks without recording an outcome.
    pub fn drain(&mut self) -> Vec<InitCallback> {
        match &mut self.state {
            UnitState::Creating(callbacks)
            | UnitState::Initializing(callbacks) => std::mem::take(callbacks),
            _ => Vec::new(),
        }
    }
}
