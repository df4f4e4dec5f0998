//! File-backed `SessionStore` (JSON map in the app data directory).
//!
//! Plays the role the browser's local storage plays for the storefront:
//! auth token, cached profile, recently viewed products. Values are opaque
//! strings; persistence is best-effort — a failed write keeps the
//! in-memory view authoritative and logs a warning.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use mandato_core::SessionStore;
use parking_lot::RwLock;
use tracing::warn;

#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    inner: RwLock<HashMap<String, String>>,
}

impl FileSessionStore {
    /// Open the store at `path`, loading any existing content. A missing
    /// or unreadable file starts empty.
    pub fn open(path: PathBuf) -> Self {
        let inner = fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str::<HashMap<String, String>>(&raw).ok())
            .unwrap_or_default();
        Self {
            path,
            inner: RwLock::new(inner),
        }
    }

    fn persist(&self, snapshot: &HashMap<String, String>) {
        let write = || -> std::io::Result<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            let json = serde_json::to_string_pretty(snapshot).map_err(std::io::Error::other)?;
            fs::write(&self.path, json)
        };
        if let Err(e) = write() {
            warn!(path = %self.path.display(), error = %e, "session store write failed");
        }
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut guard = self.inner.write();
        guard.insert(key.to_string(), value.to_string());
        self.persist(&guard);
    }

    fn remove(&self, key: &str) {
        let mut guard = self.inner.write();
        guard.remove(key);
        self.persist(&guard);
    }

    fn clear(&self) {
        let mut guard = self.inner.write();
        guard.clear();
        self.persist(&guard);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mandato_core::session::AUTH_TOKEN_KEY;

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");

        let store = FileSessionStore::open(path.clone());
        store.set(AUTH_TOKEN_KEY, "tok-abc");
        store.set("user_profile", r#"{"name":"Ana"}"#);
        drop(store);

        let reopened = FileSessionStore::open(path);
        assert_eq!(reopened.get(AUTH_TOKEN_KEY).as_deref(), Some("tok-abc"));
        assert_eq!(
            reopened.get("user_profile").as_deref(),
            Some(r#"{"name":"Ana"}"#)
        );
    }

    #[test]
    fn clear_persists_the_empty_map() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");

        let store = FileSessionStore::open(path.clone());
        store.set(AUTH_TOKEN_KEY, "tok");
        store.clear();
        drop(store);

        let reopened = FileSessionStore::open(path);
        assert!(reopened.get(AUTH_TOKEN_KEY).is_none());
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        fs::write(&path, "esto no es json").expect("write garbage");

        let store = FileSessionStore::open(path);
        assert!(store.get(AUTH_TOKEN_KEY).is_none());
    }
}
