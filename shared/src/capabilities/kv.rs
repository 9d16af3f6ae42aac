use crux_kv::error::KeyValueError;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// What the key-value capability hands back for get/set/delete: the stored
/// (or previous) bytes, if any.
pub type KvReply = Result<Option<Vec<u8>>, KeyValueError>;

pub const MAX_VALUE_SIZE: usize = 64 * 1024;

const TRUE_LITERAL: &[u8] = b"true";
const FALSE_LITERAL: &[u8] = b"false";

/// The fixed keys the dashboard mirrors its state under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StorageKey {
    LoggedIn,
    DarkMode,
    Language,
    User,
}

impl StorageKey {
    pub const ALL: [StorageKey; 4] = [
        StorageKey::LoggedIn,
        StorageKey::DarkMode,
        StorageKey::Language,
        StorageKey::User,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StorageKey::LoggedIn => "isLoggedIn",
            StorageKey::DarkMode => "darkMode",
            StorageKey::Language => "language",
            StorageKey::User => "user",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KvError {
    #[error("value for '{key}' is not valid UTF-8")]
    NotUtf8 { key: StorageKey },

    #[error("unexpected value for '{key}': {value:?}")]
    UnexpectedValue { key: StorageKey, value: String },

    #[error("serialization error for '{key}': {message}")]
    Serialization { key: StorageKey, message: String },

    #[error("value too large: {size} bytes exceeds maximum of {max} bytes")]
    ValueTooLarge { size: usize, max: usize },
}

/// A single write the core wants the shell to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreWrite {
    pub key: StorageKey,
    pub value: Vec<u8>,
}

impl StoreWrite {
    pub fn new(key: StorageKey, value: Vec<u8>) -> Result<Self, KvError> {
        if value.len() > MAX_VALUE_SIZE {
            return Err(KvError::ValueTooLarge {
                size: value.len(),
                max: MAX_VALUE_SIZE,
            });
        }
        Ok(Self { key, value })
    }

    pub fn flag(key: StorageKey, value: bool) -> Self {
        Self {
            key,
            value: encode_flag(value),
        }
    }

    pub fn json<T: Serialize>(key: StorageKey, value: &T) -> Result<Self, KvError> {
        Self::new(key, encode_json(key, value)?)
    }
}

#[must_use]
pub fn encode_flag(value: bool) -> Vec<u8> {
    if value {
        TRUE_LITERAL.to_vec()
    } else {
        FALSE_LITERAL.to_vec()
    }
}

/// Absent reads as `false`; anything other than the two literals is an error
/// the caller is expected to downgrade to `false`.
pub fn decode_flag(key: StorageKey, raw: Option<&[u8]>) -> Result<bool, KvError> {
    match raw {
        None => Ok(false),
        Some(TRUE_LITERAL) => Ok(true),
        Some(FALSE_LITERAL) => Ok(false),
        Some(other) => Err(KvError::UnexpectedValue {
            key,
            value: String::from_utf8_lossy(other).into_owned(),
        }),
    }
}

pub fn decode_text(key: StorageKey, raw: &[u8]) -> Result<&str, KvError> {
    std::str::from_utf8(raw).map_err(|_| KvError::NotUtf8 { key })
}

pub fn encode_json<T: Serialize>(key: StorageKey, value: &T) -> Result<Vec<u8>, KvError> {
    serde_json::to_vec(value).map_err(|e| KvError::Serialization {
        key,
        message: e.to_string(),
    })
}

pub fn decode_json<T: DeserializeOwned>(key: StorageKey, raw: &[u8]) -> Result<T, KvError> {
    serde_json::from_slice(raw).map_err(|e| KvError::Serialization {
        key,
        message: e.to_string(),
    })
}
