//! Persistent string key → string value namespace.
//!
//! Everything the tool remembers between runs (cached audits, user
//! histories, API keys, dismissal flags) lives under one namespace behind
//! the [`KeyValueStore`] trait. Values are opaque strings; callers that
//! store structured data serialize it to JSON themselves.

pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::StorageError;

/// Key holding the global audit cache.
pub const AUDIT_RESULTS_KEY: &str = "cro_audit_results";

/// Suffix of a user's audit history key, see [`user_key`].
pub const USER_AUDIT_RESULTS_KEY: &str = "audit_results";

/// Key holding the global API credential.
pub const API_KEY_KEY: &str = "openai_api_key";

/// Build a per-user key, e.g. `user_abc_audit_results`.
pub fn user_key(user_id: &str, key: &str) -> String {
    format!("user_{}_{}", user_id, key)
}

/// Build a dismissal-flag key, e.g. `cro_tooltip_dismissed`.
pub fn dismissal_key(flag: &str) -> String {
    format!("{}_dismissed", flag)
}

/// Synchronous key-value persistence.
///
/// Implementations must be safe to share across tasks; writes are
/// expected to be durable once `set` returns `Ok`.
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or replace a value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Backend name for diagnostics.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_key_layout() {
        assert_eq!(user_key("u1", "audit_results"), "user_u1_audit_results");
        assert_eq!(user_key("u1", "openai_api_key"), "user_u1_openai_api_key");
    }

    #[test]
    fn test_dismissal_key_layout() {
        assert_eq!(dismissal_key("cro_tooltip"), "cro_tooltip_dismissed");
    }
}
