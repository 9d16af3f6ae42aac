//! Native backing stores for the key-value capability.
//!
//! Shells that run the core natively (and the integration tests) resolve
//! `KeyValueOperation`s against one of these through [`execute`].

use crux_kv::{
    error::KeyValueError, value::Value, KeyValueOperation, KeyValueResponse, KeyValueResult,
};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[cfg(not(target_arch = "wasm32"))]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("key must not be empty")]
    EmptyKey,
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Writes `value`, returning whatever was stored before.
    fn set(&mut self, key: &str, value: Vec<u8>) -> Result<Option<Vec<u8>>, StoreError>;

    fn remove(&mut self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Keys starting with `prefix`, in ascending order.
    fn keys(&self, prefix: &str) -> Result<Vec<String>, StoreError>;

    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Vec<u8>) -> Result<Option<Vec<u8>>, StoreError> {
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }
        Ok(self.entries.insert(key.to_string(), value))
    }

    fn remove(&mut self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.remove(key))
    }

    fn keys(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .entries
            .range(prefix.to_string()..)
            .map(|(key, _)| key)
            .take_while(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use self::sqlite::SqliteStore;

#[cfg(not(target_arch = "wasm32"))]
mod sqlite {
    use super::{KeyValueStore, StoreError};
    use rusqlite::{params, Connection, OptionalExtension};
    use std::path::Path;

    /// File-backed store; survives process restarts.
    pub struct SqliteStore {
        conn: Connection,
    }

    impl SqliteStore {
        pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
            Self::init(Connection::open(path)?)
        }

        pub fn open_in_memory() -> Result<Self, StoreError> {
            Self::init(Connection::open_in_memory()?)
        }

        fn init(conn: Connection) -> Result<Self, StoreError> {
            conn.execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS kv (
                    key TEXT PRIMARY KEY,
                    value BLOB NOT NULL
                );
                "#,
            )?;
            Ok(Self { conn })
        }
    }

    impl KeyValueStore for SqliteStore {
        fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
            Ok(self
                .conn
                .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                    row.get(0)
                })
                .optional()?)
        }

        fn set(&mut self, key: &str, value: Vec<u8>) -> Result<Option<Vec<u8>>, StoreError> {
            if key.is_empty() {
                return Err(StoreError::EmptyKey);
            }
            let tx = self.conn.transaction()?;
            let previous: Option<Vec<u8>> = tx
                .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                    row.get(0)
                })
                .optional()?;
            tx.execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )?;
            tx.commit()?;
            Ok(previous)
        }

        fn remove(&mut self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
            let tx = self.conn.transaction()?;
            let previous: Option<Vec<u8>> = tx
                .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                    row.get(0)
                })
                .optional()?;
            tx.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
            tx.commit()?;
            Ok(previous)
        }

        fn keys(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
            let mut stmt = self.conn.prepare("SELECT key FROM kv ORDER BY key")?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
            let mut keys = Vec::new();
            for key in rows {
                let key = key?;
                if key.starts_with(prefix) {
                    keys.push(key);
                }
            }
            Ok(keys)
        }
    }
}

fn to_value(bytes: Option<Vec<u8>>) -> Value {
    bytes.map_or(Value::None, Value::Bytes)
}

/// Resolves one key-value effect against a native store.
///
/// Listing is not paginated: every matching key comes back in one page and
/// any non-zero cursor is rejected.
pub fn execute<S: KeyValueStore + ?Sized>(
    store: &mut S,
    operation: &KeyValueOperation,
) -> KeyValueResult {
    let response = match operation {
        KeyValueOperation::Get { key } => store.get(key).map(|value| KeyValueResponse::Get {
            value: to_value(value),
        }),
        KeyValueOperation::Set { key, value } => {
            store
                .set(key, value.clone())
                .map(|previous| KeyValueResponse::Set {
                    previous: to_value(previous),
                })
        }
        KeyValueOperation::Delete { key } => {
            store.remove(key).map(|previous| KeyValueResponse::Delete {
                previous: to_value(previous),
            })
        }
        KeyValueOperation::Exists { key } => store
            .contains(key)
            .map(|is_present| KeyValueResponse::Exists { is_present }),
        KeyValueOperation::ListKeys { prefix, cursor } => {
            if *cursor != 0 {
                return KeyValueResult::Err {
                    error: KeyValueError::CursorNotFound,
                };
            }
            store.keys(prefix).map(|keys| KeyValueResponse::ListKeys {
                keys,
                next_cursor: 0,
            })
        }
    };

    match response {
        Ok(response) => KeyValueResult::Ok { response },
        Err(e) => {
            tracing::warn!(error = %e, "key-value operation failed");
            KeyValueResult::Err {
                error: KeyValueError::Io {
                    message: e.to_string(),
                },
            }
        }
    }
}
