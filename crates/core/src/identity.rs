//! Identity of a wallet session.
use crate::{BackendKind, Error, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::{fmt, str::FromStr};

/// Compute the identity hash for a backend kind and source identifier.
///
/// The digest is SHA-256 over the kind code (big-endian `u32`),
/// the length of the source (big-endian `u64`) and the UTF-8 bytes
/// of the source. Length prefixing keeps the encoding unambiguous so
/// distinct pairs never share an input.
///
/// Any string is a valid source, including the empty string.
pub fn identity(kind: BackendKind, source: &str) -> IdentityHash {
    let mut hasher = Sha256::new();
    hasher.update(kind.code().to_be_bytes());
    hasher.update((source.len() as u64).to_be_bytes());
    hasher.update(source.as_bytes());
    IdentityHash(hasher.finalize().into())
}

/// Backend kind and source identifier for a wallet session.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    kind: BackendKind,
    source: String,
}

impl Identity {
    /// Create an identity.
    pub fn new(kind: BackendKind, source: impl Into<String>) -> Self {
        Self {
            kind,
            source: source.into(),
        }
    }

    /// Backend kind.
    pub fn kind(&self) -> BackendKind {
        self.kind
    }

    /// Source identifier.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Stable hash of this identity.
    pub fn hash(&self) -> IdentityHash {
        identity(self.kind, &self.source)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.source)
    }
}

/// Digest identifying a wallet session.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct IdentityHash([u8; 32]);

impl IdentityHash {
    /// Length of the digest in bytes.
    pub const LEN: usize = 32;

    /// Digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for IdentityHash {
    fn from(value: [u8; 32]) -> Self {
        Self(value)
    }
}

impl From<&Identity> for IdentityHash {
    fn from(value: &Identity) -> Self {
        value.hash()
    }
}

impl AsRef<[u8]> for IdentityHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for IdentityHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for IdentityHash {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)?;
        let value: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| Error::IdentityHashLength(Self::LEN, bytes.len()))?;
        Ok(Self(value))
    }
}

impl Serialize for IdentityHash {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        hex::serde::serialize(self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for IdentityHash {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value: [u8; 32] = hex::serde::deserialize(deserializer)?;
        Ok(Self(value))
    }
}
