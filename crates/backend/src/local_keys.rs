//! Reference backend holding keys for a local source directory.
use crate::{Error, WalletBackend};
use async_trait::async_trait;
use ed25519_dalek::SigningKey;
use parking_lot::RwLock;
use rand::rngs::OsRng;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use wallet_core::{codes, BackendError, BackendKind};
use zeroize::{Zeroize, Zeroizing};

/// Configuration for the local keys backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalKeysConfig {
    /// Accepted mnemonic lengths when importing keys.
    pub word_counts: Vec<usize>,
}

impl Default for LocalKeysConfig {
    fn default() -> Self {
        Self {
            word_counts: vec![24],
        }
    }
}

impl LocalKeysConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> crate::Result<()> {
        if self.word_counts.is_empty() {
            return Err(Error::NoWordCounts);
        }
        for count in &self.word_counts {
            if *count == 0 || count % 3 != 0 {
                return Err(Error::InvalidWordCount(*count));
            }
        }
        Ok(())
    }
}

struct KeyEntry {
    public_key: String,
    password: Option<SecretString>,
}

impl KeyEntry {
    fn new(signing_key: &SigningKey) -> Self {
        Self {
            public_key: hex::encode(signing_key.verifying_key().as_bytes()),
            password: None,
        }
    }
}

#[derive(Default)]
struct KeyStore {
    source: Option<PathBuf>,
    keys: Vec<KeyEntry>,
}

impl KeyStore {
    fn find(&self, public_key: &str) -> Option<&KeyEntry> {
        self.keys.iter().find(|k| k.public_key == public_key)
    }

    fn insert(&mut self, entry: KeyEntry) -> Result<String, BackendError> {
        if self.source.is_none() {
            return Err(BackendError::not_initialized());
        }
        if self.find(&entry.public_key).is_some() {
            return Err(BackendError::new(
                codes::DUPLICATE_KEY,
                format!("key {} already exists", entry.public_key),
            ));
        }
        let public_key = entry.public_key.clone();
        self.keys.push(entry);
        Ok(public_key)
    }
}

/// Backend tracking ed25519 public keys in memory for a source directory.
///
/// The source identifier must name an existing directory.
pub struct LocalKeysBackend {
    config: LocalKeysConfig,
    store: RwLock<KeyStore>,
}

impl LocalKeysBackend {
    /// Create an uninitialized backend.
    pub fn new(config: LocalKeysConfig) -> Self {
        Self {
            config,
            store: RwLock::new(Default::default()),
        }
    }

    /// Source directory once initialized.
    pub fn source(&self) -> Option<PathBuf> {
        self.store.read().source.clone()
    }

    fn derive_key(&self, words: &[String]) -> Result<SigningKey, BackendError> {
        if !self.config.word_counts.contains(&words.len()) {
            return Err(BackendError::new(
                codes::INVALID_MNEMONIC,
                format!(
                    "expected {:?} words but got {}",
                    self.config.word_counts,
                    words.len()
                ),
            ));
        }

        if words
            .iter()
            .any(|w| w.is_empty() || !w.chars().all(|c| c.is_ascii_alphabetic()))
        {
            return Err(BackendError::new(
                codes::INVALID_MNEMONIC,
                "mnemonic words must be alphabetic",
            ));
        }

        let phrase = Zeroizing::new(words.join(" ").to_lowercase());
        let mut seed: [u8; 32] = Sha256::digest(phrase.as_bytes()).into();
        let signing_key = SigningKey::from_bytes(&seed);
        seed.zeroize();
        Ok(signing_key)
    }
}

#[async_trait]
impl WalletBackend for LocalKeysBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::LocalKeys
    }

    async fn initialize(&self, source: &str) -> Result<(), BackendError> {
        if self.store.read().source.is_some() {
            return Err(BackendError::new(
                codes::ALREADY_INITIALIZED,
                "backend is already initialized",
            ));
        }

        let path = PathBuf::from(source);
        let is_dir = tokio::fs::metadata(&path)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false);
        if !is_dir {
            return Err(BackendError::new(
                codes::SOURCE_NOT_FOUND,
                format!("source directory {} does not exist", source),
            ));
        }

        let mut store = self.store.write();
        if store.source.is_some() {
            return Err(BackendError::new(
                codes::ALREADY_INITIALIZED,
                "backend is already initialized",
            ));
        }
        tracing::debug!(source = %path.display(), "local_keys::initialize");
        store.source = Some(path);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.store
            .read()
            .keys
            .iter()
            .map(|k| k.public_key.clone())
            .collect()
    }

    fn has_password(&self, public_key: &str) -> bool {
        self.store
            .read()
            .find(public_key)
            .map(|k| k.password.is_some())
            .unwrap_or(false)
    }

    async fn create_new_key(&self) -> Result<String, BackendError> {
        let mut csprng = OsRng;
        let entry = KeyEntry::new(&SigningKey::generate(&mut csprng));
        let public_key = self.store.write().insert(entry)?;
        tracing::debug!(public_key = %public_key, "local_keys::create_new_key");
        Ok(public_key)
    }

    async fn import_keys(
        &self,
        words: &[String],
    ) -> Result<String, BackendError> {
        if self.store.read().source.is_none() {
            return Err(BackendError::not_initialized());
        }
        let entry = KeyEntry::new(&self.derive_key(words)?);
        let public_key = self.store.write().insert(entry)?;
        tracing::debug!(public_key = %public_key, "local_keys::import_keys");
        Ok(public_key)
    }

    async fn change_password(
        &self,
        public_key: &str,
        password: SecretString,
    ) -> Result<(), BackendError> {
        let mut store = self.store.write();
        if store.source.is_none() {
            return Err(BackendError::not_initialized());
        }
        let entry = store
            .keys
            .iter_mut()
            .find(|k| k.public_key == public_key)
            .ok_or_else(|| {
                BackendError::new(
                    codes::KEY_NOT_FOUND,
                    format!("key {} not found", public_key),
                )
            })?;
        entry.password = Some(password);
        Ok(())
    }
}
