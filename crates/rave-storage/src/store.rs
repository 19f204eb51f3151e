//! Key-value capability

use crate::error::StorageError;
use crate::Result;

/// A string key-value slot store.
///
/// Implementations must be safe to share between the composer and the
/// session store, so all methods take `&self`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}

pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
