//! Credential and preference lookup for the current user.
//!
//! An anonymous session reads and writes the global `openai_api_key`; a
//! signed-in session uses `user_<id>_openai_api_key`. Storage failures are
//! logged and treated as "nothing stored" so a broken store degrades to
//! demo mode instead of aborting.

use std::sync::Arc;

use tracing::{info, warn};

use crate::storage::{dismissal_key, user_key, KeyValueStore, API_KEY_KEY};

pub struct Session {
    store: Arc<dyn KeyValueStore>,
    user_id: Option<String>,
}

impl Session {
    pub fn new(store: Arc<dyn KeyValueStore>, user_id: Option<String>) -> Self {
        let user_id = user_id.filter(|id| !id.trim().is_empty());
        Self { store, user_id }
    }

    /// Signed-in user, if any.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.store)
    }

    /// Stored API credential for this session. Blank values count as absent.
    pub fn api_key(&self) -> Option<String> {
        let key = self.api_key_slot();
        match self.store.get(&key) {
            Ok(value) => value.filter(|v| !v.trim().is_empty()),
            Err(e) => {
                warn!(key = %key, "Failed to read API key: {}", e);
                None
            }
        }
    }

    pub fn set_api_key(&self, value: &str) -> bool {
        let key = self.api_key_slot();
        match self.store.set(&key, value.trim()) {
            Ok(()) => {
                info!(key = %key, "Stored API key");
                true
            }
            Err(e) => {
                warn!(key = %key, "Failed to store API key: {}", e);
                false
            }
        }
    }

    pub fn clear_api_key(&self) -> bool {
        let key = self.api_key_slot();
        match self.store.remove(&key) {
            Ok(()) => true,
            Err(e) => {
                warn!(key = %key, "Failed to clear API key: {}", e);
                false
            }
        }
    }

    /// Whether a one-time hint named `flag` was dismissed.
    pub fn is_dismissed(&self, flag: &str) -> bool {
        matches!(self.store.get(&dismissal_key(flag)), Ok(Some(v)) if v == "true")
    }

    pub fn dismiss(&self, flag: &str) {
        if let Err(e) = self.store.set(&dismissal_key(flag), "true") {
            warn!(flag, "Failed to persist dismissal: {}", e);
        }
    }

    fn api_key_slot(&self) -> String {
        match &self.user_id {
            Some(id) => user_key(id, API_KEY_KEY),
            None => API_KEY_KEY.to_string(),
        }
    }
}
