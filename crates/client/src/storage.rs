//! Local persistence port
//!
//! The cart mirrors itself into a key/value store keyed by catalog id so a
//! session survives reloads. This is a cache of intent, not the source of
//! truth — the port stays infallible on writes and best-effort on reads.

use std::collections::HashMap;
use std::sync::Mutex;

/// Key/value persistence the cart controller writes through.
pub trait CartStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory storage, the default for tests and headless sessions.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("k"), None);

        storage.set("k", "v1");
        assert_eq!(storage.get("k"), Some("v1".into()));

        storage.set("k", "v2");
        assert_eq!(storage.get("k"), Some("v2".into()));

        storage.remove("k");
        assert_eq!(storage.get("k"), None);
    }
}
