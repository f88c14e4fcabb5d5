//! Persisted key-value storage for the session. The session and the HTTP client
//! only see the `Storage` trait, so tests inject `MemoryStorage` while the CLI
//! uses `FileStorage`. Values written here include the bearer token; the file
//! backend restricts permissions to the owner and nothing here logs values.

use serde_json::Error as JsonError;
use std::{
    collections::{BTreeMap, HashMap},
    fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};
use thiserror::Error;
use tracing::{debug, warn};

/// Key holding the opaque bearer token.
pub const TOKEN_KEY: &str = "access_token";
/// Key holding the JSON snapshot of the signed-in user.
pub const USER_KEY: &str = "user_data";

const STORAGE_FILE: &str = "storage.json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode storage: {0}")]
    Encode(#[from] JsonError),
}

/// Minimal key-value port mirroring browser local storage.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    /// # Errors
    /// Returns an error when the value cannot be persisted.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// # Errors
    /// Returns an error when the backing store cannot be updated.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries().remove(key);
        Ok(())
    }
}

/// JSON file backend: all keys live in one object written atomically.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(STORAGE_FILE),
            lock: Mutex::new(()),
        }
    }

    /// Per-user config directory, `None` when the platform has none.
    #[must_use]
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("wasigo"))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(BTreeMap::new());
        }

        match serde_json::from_slice(&bytes) {
            Ok(entries) => Ok(entries),
            Err(err) => {
                // A damaged file is treated as empty and replaced on next write.
                warn!("Ignoring corrupt storage file {}: {}", self.path.display(), err);
                Ok(BTreeMap::new())
            }
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let payload = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        write_private(&tmp, &payload).map_err(|source| StorageError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })?;

        debug!("storage written: {}", self.path.display());

        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = self.guard();
        match self.load() {
            Ok(mut entries) => entries.remove(key),
            Err(err) => {
                warn!("Failed to read storage: {err}");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.guard();
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.guard();
        let mut entries = self.load()?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.save(&entries)
    }
}

#[cfg(unix)]
fn write_private(path: &Path, payload: &[u8]) -> io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(payload)?;
    file.sync_all()
}

#[cfg(not(unix))]
fn write_private(path: &Path, payload: &[u8]) -> io::Result<()> {
    fs::write(path, payload)
}

#[cfg(test)]
mod tests {
    use super::{FileStorage, MemoryStorage, Storage, TOKEN_KEY, USER_KEY};
    use anyhow::Result;

    #[test]
    fn memory_storage_roundtrip() -> Result<()> {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get(TOKEN_KEY), None);

        storage.set(TOKEN_KEY, "abc")?;
        assert_eq!(storage.get(TOKEN_KEY), Some("abc".to_string()));

        storage.remove(TOKEN_KEY)?;
        assert_eq!(storage.get(TOKEN_KEY), None);
        Ok(())
    }

    #[test]
    fn file_storage_persists_across_instances() -> Result<()> {
        let dir = tempfile::tempdir()?;

        let first = FileStorage::new(dir.path());
        first.set(TOKEN_KEY, "token-1")?;
        first.set(USER_KEY, r#"{"id":"1"}"#)?;

        let second = FileStorage::new(dir.path());
        assert_eq!(second.get(TOKEN_KEY), Some("token-1".to_string()));
        assert_eq!(second.get(USER_KEY), Some(r#"{"id":"1"}"#.to_string()));

        second.remove(USER_KEY)?;
        assert_eq!(first.get(USER_KEY), None);
        assert_eq!(first.get(TOKEN_KEY), Some("token-1".to_string()));
        Ok(())
    }

    #[test]
    fn file_storage_missing_file_reads_empty() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::new(dir.path().join("nested"));

        assert_eq!(storage.get(TOKEN_KEY), None);
        // removing an absent key must not create the file
        storage.remove(TOKEN_KEY)?;
        assert!(!storage.path().exists());
        Ok(())
    }

    #[test]
    fn file_storage_recovers_from_corrupt_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::new(dir.path());
        std::fs::write(storage.path(), b"{not json")?;

        assert_eq!(storage.get(TOKEN_KEY), None);
        storage.set(TOKEN_KEY, "fresh")?;
        assert_eq!(storage.get(TOKEN_KEY), Some("fresh".to_string()));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn file_storage_is_owner_only() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir()?;
        let storage = FileStorage::new(dir.path());
        storage.set(TOKEN_KEY, "secret")?;

        let mode = std::fs::metadata(storage.path())?.permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        Ok(())
    }
}
