//! In-memory storage adapter for tests and native hosts.
//!
//! Cloning a [`MemoryStorage`] shares the underlying map — clones model the
//! tabs of one browser profile seeing the same profile-scoped storage. A
//! fresh instance models a tab-scoped area (never shared, never duplicated).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::session::StorageArea;

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    map: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageArea for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.map.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut map) = self.map.lock() {
            map.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut map) = self.map.lock() {
            map.remove(key);
        }
    }
}
