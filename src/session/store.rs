//! Persistent client storage for session state
//!
//! A small key/value store holding the access token, refresh token and the
//! serialized user. The file-backed store keeps everything in one JSON map so
//! that multi-key writes and clears land in a single atomic replace.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::error::{AppraiseError, Result};

/// Key/value storage backing a [`Session`](super::Session)
pub trait SessionStore: Send + Sync {
    /// Read one key
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write several keys in one step
    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()>;

    /// Remove several keys in one step
    fn remove_many(&self, keys: &[&str]) -> Result<()>;

    /// Write one key
    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_many(&[(key, value)])
    }
}

/// In-process store, used for tests and one-shot sessions
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> AppraiseError {
    AppraiseError::Other("session store lock poisoned".to_string())
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn set_many(&self, items: &[(&str, &str)]) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        for (key, value) in items {
            entries.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }
}

/// JSON file store (`session.json` in the client config directory)
pub struct FileSessionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    /// Open (or lazily create) the store inside `dir`
    pub fn new(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join("session.json");
        debug!("Session store at {}", path.display());
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                // Unreadable state reads as signed out; the next write replaces it
                warn!("Ignoring corrupt session file {}: {}", self.path.display(), e);
                Ok(BTreeMap::new())
            }
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(entries)?)?;

        // Set file permissions to 0600 on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&tmp)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&tmp, perms)?;
        }

        fs::rename(&tmp, &self.path)?;
        debug!("Saved {} session keys", entries.len());
        Ok(())
    }

    fn update<F>(&self, apply: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = self.write_lock.lock().map_err(|_| poisoned())?;
        let mut entries = self.load()?;
        apply(&mut entries);
        self.save(&entries)
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.get(key).cloned())
    }

    fn set_many(&self, items: &[(&str, &str)]) -> Result<()> {
        self.update(|entries| {
            for (key, value) in items {
                entries.insert(key.to_string(), value.to_string());
            }
        })
    }

    fn remove_many(&self, keys: &[&str]) -> Result<()> {
        self.update(|entries| {
            for key in keys {
                entries.remove(*key);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemorySessionStore::new();
        assert!(store.is_empty());

        store.set("accessToken", "abc").unwrap();
        assert_eq!(store.get("accessToken").unwrap().as_deref(), Some("abc"));

        store.remove_many(&["accessToken", "missing"]).unwrap();
        assert!(store.get("accessToken").unwrap().is_none());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let temp = TempDir::new().unwrap();

        let store = FileSessionStore::new(temp.path()).unwrap();
        store
            .set_many(&[("accessToken", "a"), ("refreshToken", "r")])
            .unwrap();

        let reopened = FileSessionStore::new(temp.path()).unwrap();
        assert_eq!(reopened.get("refreshToken").unwrap().as_deref(), Some("r"));
    }

    #[test]
    fn test_file_store_clear_removes_all_keys_at_once() {
        let temp = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp.path()).unwrap();
        store
            .set_many(&[("accessToken", "a"), ("refreshToken", "r"), ("user", "{}")])
            .unwrap();

        store
            .remove_many(&["accessToken", "refreshToken", "user"])
            .unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let map: BTreeMap<String, String> = serde_json::from_str(&raw).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let temp = TempDir::new().unwrap();
        let store = FileSessionStore::new(&temp.path().join("nested")).unwrap();
        assert!(store.get("user").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_reads_as_empty_and_is_replaced() {
        let temp = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp.path()).unwrap();
        fs::write(store.path(), "{truncated").unwrap();

        assert!(store.get("accessToken").unwrap().is_none());

        store
            .remove_many(&["accessToken", "refreshToken", "user"])
            .unwrap();
        store.set("accessToken", "fresh").unwrap();
        assert_eq!(store.get("accessToken").unwrap().as_deref(), Some("fresh"));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp.path()).unwrap();
        store.set("accessToken", "a").unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
