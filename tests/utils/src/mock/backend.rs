use async_trait::async_trait;
use parking_lot::Mutex;
use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};
use tokio::sync::watch;
use wallet_backend::{
    secrecy::SecretString, BackendFactory, BoxedBackend, WalletBackend,
};
use wallet_core::{codes, BackendError, BackendKind, InitOutcome};

type Gate = watch::Sender<Option<InitOutcome>>;

#[derive(Default)]
struct MockState {
    constructed: AtomicUsize,
    initialize_calls: AtomicUsize,
    dropped: AtomicUsize,
    gates: Mutex<HashMap<String, Gate>>,
    panics: Mutex<HashSet<String>>,
}

impl MockState {
    fn gate(&self, source: &str) -> watch::Receiver<Option<InitOutcome>> {
        let mut gates = self.gates.lock();
        gates
            .entry(source.to_owned())
            .or_insert_with(|| watch::channel(None).0)
            .subscribe()
    }
}

/// Factory creating [`MockBackend`] for [`BackendKind::LocalKeys`].
///
/// Initialization for a source waits until the test releases
/// an outcome for that source.
#[derive(Clone, Default)]
pub struct MockFactory {
    state: Arc<MockState>,
}

impl MockFactory {
    /// Create a factory.
    pub fn new() -> Self {
        Default::default()
    }

    /// Complete initialization for a source.
    ///
    /// Backends initialized for the source later complete
    /// immediately with the same outcome.
    pub fn release(&self, source: &str, outcome: InitOutcome) {
        let mut gates = self.state.gates.lock();
        gates
            .entry(source.to_owned())
            .or_insert_with(|| watch::channel(None).0)
            .send_replace(Some(outcome));
    }

    /// Block initialization for a source again.
    pub fn reset(&self, source: &str) {
        if let Some(gate) = self.state.gates.lock().get(source) {
            gate.send_replace(None);
        }
    }

    /// Panic when initializing a source.
    pub fn panic_on(&self, source: &str) {
        self.state.panics.lock().insert(source.to_owned());
    }

    /// Number of backends constructed.
    pub fn constructed(&self) -> usize {
        self.state.constructed.load(Ordering::SeqCst)
    }

    /// Number of calls to initialize.
    pub fn initialize_calls(&self) -> usize {
        self.state.initialize_calls.load(Ordering::SeqCst)
    }

    /// Number of backends dropped.
    pub fn dropped(&self) -> usize {
        self.state.dropped.load(Ordering::SeqCst)
    }
}

impl BackendFactory for MockFactory {
    fn create(&self, kind: BackendKind) -> Option<BoxedBackend> {
        match kind {
            BackendKind::LocalKeys => {
                self.state.constructed.fetch_add(1, Ordering::SeqCst);
                Some(Box::new(MockBackend {
                    state: Arc::clone(&self.state),
                    keys: Default::default(),
                }))
            }
            BackendKind::Unsupported(_) => None,
        }
    }
}

/// Backend whose initialization is controlled by a [`MockFactory`].
pub struct MockBackend {
    state: Arc<MockState>,
    keys: Mutex<Vec<String>>,
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.state.dropped.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl WalletBackend for MockBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::LocalKeys
    }

    async fn initialize(&self, source: &str) -> Result<(), BackendError> {
        self.state.initialize_calls.fetch_add(1, Ordering::SeqCst);
        if self.state.panics.lock().contains(source) {
            panic!("mock backend panicked for {}", source);
        }

        let mut gate = self.state.gate(source);
        let outcome = gate
            .wait_for(|outcome| outcome.is_some())
            .await
            .map_err(|_| BackendError::new(codes::NOT_INITIALIZED, "gate closed"))?
            .clone();
        tracing::debug!(source = %source, "mock::initialize");
        outcome.unwrap_or_else(|| Err(BackendError::not_initialized()))
    }

    fn keys(&self) -> Vec<String> {
        self.keys.lock().clone()
    }

    fn has_password(&self, _public_key: &str) -> bool {
        false
    }

    async fn create_new_key(&self) -> Result<String, BackendError> {
        let mut keys = self.keys.lock();
        let key = format!("mock-key-{}", keys.len());
        keys.push(key.clone());
        Ok(key)
    }

    async fn import_keys(
        &self,
        words: &[String],
    ) -> Result<String, BackendError> {
        let key = words.join("-");
        self.keys.lock().push(key.clone());
        Ok(key)
    }

    async fn change_password(
        &self,
        public_key: &str,
        _password: SecretString,
    ) -> Result<(), BackendError> {
        Err(BackendError::new(
            codes::KEY_NOT_FOUND,
            format!("key {} not found", public_key),
        ))
    }
}
