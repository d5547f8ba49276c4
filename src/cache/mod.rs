//! Audit result caches on top of the key-value store.
//!
//! Two stores with different policies:
//! - [`AuditCache`]: global, one entry per website URL, short TTL.
//! - [`AuditHistory`]: per signed-in user, newest first, capped, long TTL.
//!
//! Caching is an optimization. Every storage failure is logged and the
//! operation degrades to a no-op; nothing here returns an error.

pub mod audit_cache;
pub mod history;

pub use audit_cache::AuditCache;
pub use history::AuditHistory;

use serde_json::Value;
use tracing::warn;

use crate::audit::{upgrade_result, AuditResult};
use crate::storage::KeyValueStore;

/// Current wall-clock time in epoch milliseconds.
pub(crate) fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// `true` when an entry generated at `generated_at` is older than `ttl_ms`.
pub(crate) fn is_expired(now: i64, generated_at: i64, ttl_ms: i64) -> bool {
    now.saturating_sub(generated_at) > ttl_ms
}

pub(crate) fn entry_generated_at(entry: &Value) -> i64 {
    entry
        .get("generatedAt")
        .and_then(Value::as_i64)
        .unwrap_or_default()
}

/// Read a JSON array stored under `key`. Missing, unreadable or corrupt
/// payloads all read as empty.
pub(crate) fn read_list(store: &dyn KeyValueStore, key: &str) -> Vec<Value> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(key, backend = store.name(), "Failed to read audit list: {}", e);
            return Vec::new();
        }
    };
    match serde_json::from_str::<Vec<Value>>(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(key, "Stored audit list is corrupt, ignoring it: {}", e);
            Vec::new()
        }
    }
}

/// Persist `entries` under `key`, logging instead of failing.
pub(crate) fn write_list(store: &dyn KeyValueStore, key: &str, entries: &[Value]) {
    let data = match serde_json::to_string(entries) {
        Ok(data) => data,
        Err(e) => {
            warn!(key, "Failed to serialize audit list: {}", e);
            return;
        }
    };
    if let Err(e) = store.set(key, &data) {
        warn!(key, backend = store.name(), "Failed to save audit list: {}", e);
    }
}

pub(crate) fn to_entry(result: &AuditResult) -> Option<Value> {
    match serde_json::to_value(result) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(id = %result.id, "Failed to serialize audit result: {}", e);
            None
        }
    }
}

/// Upgrade a stored entry, dropping it with a warning if it is unusable.
pub(crate) fn from_entry(entry: Value) -> Option<AuditResult> {
    match upgrade_result(entry) {
        Ok(result) => Some(result),
        Err(e) => {
            warn!("Skipping unreadable cached audit: {}", e);
            None
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_is_expired_boundary() {
        assert!(!is_expired(1000, 0, 1000));
        assert!(is_expired(1001, 0, 1000));
    }

    #[test]
    fn test_read_list_corrupt_payload_is_empty() {
        let store = MemoryStore::new();
        store.set("k", "{not a list").unwrap();
        assert!(read_list(&store, "k").is_empty());
    }

    #[test]
    fn test_read_write_failing_store_is_silent() {
        let store = MemoryStore::failing();
        write_list(&store, "k", &[Value::Null]);
        assert!(read_list(&store, "k").is_empty());
    }
}
