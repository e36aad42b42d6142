use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

/// Errors raised by a [`StateStore`] backend.
///
/// These never escape the persistence adapter; they exist so backends can
/// say precisely what went wrong before the adapter downgrades the failure
/// to a warning.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read state file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write state file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("state file {path} is not valid TOML: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("state store unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Key/value storage behind the persistence adapter.
///
/// Implementations are synchronous. State is a handful of short strings, so
/// backends read and write it inline rather than going through the task pool.
pub trait StateStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn save(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// State persisted as one flat TOML table of strings.
///
/// The whole table is rewritten on every save. A missing file reads as an
/// empty table; a malformed file is an error so a user's hand edits are
/// never silently discarded.
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Result<BTreeMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn write_table(&self, table: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        let rendered = toml::to_string(table).map_err(|source| StoreError::Unavailable {
            reason: format!("state not serializable: {source}"),
        })?;
        fs::write(&self.path, rendered).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl StateStore for FileStateStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_table()?.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut table = self.read_table()?;
        table.insert(key.to_string(), value.to_string());
        self.write_table(&table)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut table = self.read_table()?;
        if table.remove(key).is_some() {
            self.write_table(&table)?;
        }
        Ok(())
    }
}

/// Volatile store for tests and for sessions without a writable config dir.
#[derive(Default)]
pub struct MemoryStateStore {
    table: Mutex<BTreeMap<String, String>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded store, handy for startup tests.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let table = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            table: Mutex::new(table),
        }
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        crate::sync::lock(&self.table).clone()
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(crate::sync::lock(&self.table).get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        crate::sync::lock(&self.table).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        crate::sync::lock(&self.table).remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::{assert_err, assert_none, assert_ok, assert_some_eq};
    use tempfile::TempDir;

    #[test]
    fn file_store_roundtrips_values() {
        let dir = TempDir::new().unwrap();
        let store = FileStateStore::new(dir.path().join("state.toml"));

        assert_none!(store.load("theme").unwrap());
        assert_ok!(store.save("theme", "dracula"));
        assert_some_eq!(store.load("theme").unwrap(), "dracula".to_string());

        assert_ok!(store.save("theme", "nord"));
        assert_some_eq!(store.load("theme").unwrap(), "nord".to_string());
    }

    #[test]
    fn file_store_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("themetty").join("state.toml");
        let store = FileStateStore::new(&nested);

        assert_ok!(store.save("theme", "dracula"));
        assert!(nested.exists());
    }

    #[test]
    fn file_store_keeps_unrelated_keys_on_save() {
        let dir = TempDir::new().unwrap();
        let store = FileStateStore::new(dir.path().join("state.toml"));

        store.save("theme", "dracula").unwrap();
        store.save("active_flavor", "mocha").unwrap();
        store.remove("active_flavor").unwrap();

        assert_some_eq!(store.load("theme").unwrap(), "dracula".to_string());
        assert_none!(store.load("active_flavor").unwrap());
    }

    #[test]
    fn removing_an_absent_key_is_fine() {
        let dir = TempDir::new().unwrap();
        let store = FileStateStore::new(dir.path().join("state.toml"));
        assert_ok!(store.remove("theme"));
        assert!(!store.path().exists());
    }

    #[test]
    fn malformed_state_file_is_an_error_not_a_wipe() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.toml");
        fs::write(&path, "theme = [this is not toml").unwrap();
        let store = FileStateStore::new(&path);

        assert_err!(store.load("theme"));
        assert_err!(store.save("theme", "nord"));
        // The broken file is still there for the user to inspect.
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("not toml"));
    }

    #[test]
    fn memory_store_roundtrips_and_snapshots() {
        let store = MemoryStateStore::with_entries([("theme", "nord")]);
        assert_some_eq!(store.load("theme").unwrap(), "nord".to_string());
        store.save("theme", "dracula").unwrap();
        store.remove("missing").unwrap();
        assert_eq!(store.snapshot().get("theme").unwrap(), "dracula");
    }
}
