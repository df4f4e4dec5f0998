//! Session storage abstraction.
//!
//! The surrounding pages historically reached into an ambient key/value
//! store (auth token, cached profile, recently viewed products). Here that
//! access is an explicit capability injected into whatever reads it, so
//! tests can substitute an in-memory store and the app can persist to disk.

use std::collections::HashMap;

use parking_lot::RwLock;

/// Key under which the bearer token for the command backend is stored.
pub const AUTH_TOKEN_KEY: &str = "auth_token";
/// Key under which the cached user profile JSON is stored.
pub const USER_PROFILE_KEY: &str = "user_profile";
/// Key under which the recently-viewed product list JSON is stored.
pub const RECENT_PRODUCTS_KEY: &str = "recent_products";

/// Opaque string key/value storage with JSON-serialized values.
///
/// No core logic depends on the internal format of a value beyond
/// get/set/remove semantics.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
    fn clear(&self);
}

/// In-memory store used in tests and as a default when no persistence
/// backend is configured.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: RwLock<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.inner.write().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.inner.write().remove(key);
    }

    fn clear(&self) {
        self.inner.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove_round_trip() {
        let store = MemorySessionStore::new();
        assert!(store.get(AUTH_TOKEN_KEY).is_none());

        store.set(AUTH_TOKEN_KEY, "tok-123");
        assert_eq!(store.get(AUTH_TOKEN_KEY).as_deref(), Some("tok-123"));

        store.remove(AUTH_TOKEN_KEY);
        assert!(store.get(AUTH_TOKEN_KEY).is_none());
    }

    #[test]
    fn clear_empties_all_keys() {
        let store = MemorySessionStore::new();
        store.set(AUTH_TOKEN_KEY, "tok");
        store.set(USER_PROFILE_KEY, r#"{"name":"Ana"}"#);
        store.clear();
        assert!(store.get(AUTH_TOKEN_KEY).is_none());
        assert!(store.get(USER_PROFILE_KEY).is_none());
    }
}
