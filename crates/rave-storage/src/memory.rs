//! In-memory store, lives as long as the process (one "tab")

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::store::{validate_key, KeyValueStore};
use crate::Result;

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    slots: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        Ok(self.slots.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.slots.write().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
