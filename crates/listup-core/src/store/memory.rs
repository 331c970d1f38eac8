//! In-memory byte store.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{check_key, ByteStore, StoreError};

#[derive(Debug, Default)]
pub struct MemoryByteStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryByteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.blobs.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ByteStore for MemoryByteStore {
    fn load_data(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        check_key(key)?;
        Ok(self.lock().get(key).cloned().unwrap_or_default())
    }

    fn save_data(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        check_key(key)?;
        self.lock().insert(key.to_string(), data.to_vec());
        Ok(())
    }

    fn clear_data(&self, key: &str) -> Result<(), StoreError> {
        check_key(key)?;
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_loads_empty() {
        let store = MemoryByteStore::new();
        assert!(store.load_data("x").unwrap().is_empty());
        store.save_data("x", b"1").unwrap();
        assert!(store.contains("x"));
        store.clear_data("x").unwrap();
        assert!(!store.contains("x"));
    }
}
