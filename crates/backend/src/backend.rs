use async_trait::async_trait;
use secrecy::SecretString;
use wallet_core::{BackendError, BackendKind};

/// Boxed wallet backend.
pub type BoxedBackend = Box<dyn WalletBackend>;

/// Capabilities shared by all wallet backend implementations.
///
/// Implementations are shared between every session bound to the
/// same identity so they must make their own internal mutations
/// safe under concurrent calls.
#[async_trait]
pub trait WalletBackend: Send + Sync + 'static {
    /// Kind of this backend.
    fn kind(&self) -> BackendKind;

    /// Initialize the backend for a source identifier.
    ///
    /// Called at most once by the registry; implementations
    /// should reject a second call.
    async fn initialize(&self, source: &str) -> Result<(), BackendError>;

    /// Public keys held by this backend.
    ///
    /// Empty until initialization succeeds.
    fn keys(&self) -> Vec<String>;

    /// Determine if a public key is protected by a password.
    fn has_password(&self, public_key: &str) -> bool;

    /// Create a new key and return the public key.
    async fn create_new_key(&self) -> Result<String, BackendError>;

    /// Import a key from mnemonic words and return the public key.
    async fn import_keys(
        &self,
        words: &[String],
    ) -> Result<String, BackendError>;

    /// Protect a key with a password.
    async fn change_password(
        &self,
        public_key: &str,
        password: SecretString,
    ) -> Result<(), BackendError>;
}
