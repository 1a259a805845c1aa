//! Kinds of wallet backend.
use crate::Error;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Kind of wallet backend.
///
/// Hosts usually pass the kind as a numeric code; converting
/// a code that does not name a known implementation yields
/// [`BackendKind::Unsupported`] so that the factory can report
/// a miss instead of the conversion failing.
#[derive(
    Debug, Copy, Clone, Hash, Eq, PartialEq, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum BackendKind {
    /// Reference backend storing keys for a local source directory.
    LocalKeys,
    /// Code that does not name a known implementation.
    Unsupported(UnknownKind),
}

/// Backend kind code with no known implementation.
///
/// Only created by converting a code, so it never holds the
/// code of a known kind.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub struct UnknownKind(u32);

impl UnknownKind {
    /// Numeric code.
    pub fn code(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl BackendKind {
    /// Code for the local keys backend.
    pub const LOCAL_KEYS: u32 = 1;

    /// Numeric code for this kind.
    pub fn code(&self) -> u32 {
        match self {
            Self::LocalKeys => Self::LOCAL_KEYS,
            Self::Unsupported(kind) => kind.code(),
        }
    }

    /// Determine if this kind names a known implementation.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }
}

impl From<u32> for BackendKind {
    fn from(value: u32) -> Self {
        match value {
            Self::LOCAL_KEYS => Self::LocalKeys,
            _ => Self::Unsupported(UnknownKind(value)),
        }
    }
}

impl From<BackendKind> for u32 {
    fn from(value: BackendKind) -> Self {
        value.code()
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalKeys => write!(f, "local-keys"),
            Self::Unsupported(kind) => write!(f, "{}", kind),
        }
    }
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "local-keys" => Ok(Self::LocalKeys),
            _ => s
                .parse::<u32>()
                .map(Self::from)
                .map_err(|_| Error::UnknownKind(s.to_string())),
        }
    }
}

impl TryFrom<String> for BackendKind {
    type Error = Error;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BackendKind> for String {
    fn from(value: BackendKind) -> Self {
        value.to_string()
    }
}
