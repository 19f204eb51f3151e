//! Session identifier store

use rave_storage::KeyValueStore;
use std::sync::Arc;

use crate::token::generate_session_id;
use crate::Result;

/// Slot key the token is persisted under.
pub const SESSION_KEY: &str = "chatSessionId";

#[derive(Clone)]
pub struct SessionIdStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionIdStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Return the tab's token, generating and persisting one on first call.
    pub fn get_or_create_session_id(&self) -> Result<String> {
        if let Some(existing) = self.store.get(SESSION_KEY)? {
            if !existing.is_empty() {
                return Ok(existing);
            }
        }

        let session_id = generate_session_id();
        self.store.set(SESSION_KEY, &session_id)?;

        tracing::info!(session_id = %session_id, "Created chat session");

        Ok(session_id)
    }
}
