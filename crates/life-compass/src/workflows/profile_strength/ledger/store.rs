use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

const KEY_PREFIX: &str = "profileStrengthXpState";
const DEMO_USER: &str = "demo";

/// Storage key for a user's ledger; signed-out sessions share the demo slot.
pub fn ledger_key(user_id: Option<&str>) -> String {
    let user = user_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(DEMO_USER);
    format!("{KEY_PREFIX}:{user}")
}

/// Durable key/value slot the ledger is persisted into.
pub trait LedgerStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, LedgerStoreError>;
    fn write(&self, key: &str, payload: &str) -> Result<(), LedgerStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerStoreError {
    #[error("ledger storage io failure at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("ledger storage unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryLedgerStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryLedgerStore {
    pub fn with_entry(key: impl Into<String>, payload: impl Into<String>) -> Self {
        let store = Self::default();
        store
            .entries
            .lock()
            .expect("ledger store mutex poisoned")
            .insert(key.into(), payload.into());
        store
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn read(&self, key: &str) -> Result<Option<String>, LedgerStoreError> {
        let guard = self.entries.lock().expect("ledger store mutex poisoned");
        Ok(guard.get(key).cloned())
    }

    fn write(&self, key: &str, payload: &str) -> Result<(), LedgerStoreError> {
        let mut guard = self.entries.lock().expect("ledger store mutex poisoned");
        guard.insert(key.to_string(), payload.to_string());
        Ok(())
    }
}

/// One JSON file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileLedgerStore {
    root: PathBuf,
}

impl FileLedgerStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Percent-encodes the key so distinct keys never share a file.
    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", urlencoding::encode(key)))
    }
}

impl LedgerStore for FileLedgerStore {
    fn read(&self, key: &str) -> Result<Option<String>, LedgerStoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(payload) => Ok(Some(payload)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(LedgerStoreError::Io { path, source }),
        }
    }

    fn write(&self, key: &str, payload: &str) -> Result<(), LedgerStoreError> {
        fs::create_dir_all(&self.root).map_err(|source| LedgerStoreError::Io {
            path: self.root.clone(),
            source,
        })?;

        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, payload).map_err(|source| LedgerStoreError::Io {
            path: staging.clone(),
            source,
        })?;
        fs::rename(&staging, &path).map_err(|source| LedgerStoreError::Io { path, source })
    }
}
