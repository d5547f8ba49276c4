//! Global audit cache keyed by website URL.
//!
//! Persisted under `cro_audit_results` as a JSON array. Saving a result
//! replaces any earlier entry for the same URL. Entries expire after a
//! configurable TTL (24 hours by default) and are evicted lazily on
//! lookup or eagerly via [`AuditCache::clear_expired`]. Reads run each
//! entry through the legacy upgrade so records written by older versions
//! come back normalized.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::audit::AuditResult;
use crate::config::CacheConfig;
use crate::storage::{KeyValueStore, AUDIT_RESULTS_KEY};

use super::{entry_generated_at, from_entry, is_expired, now_ms, read_list, to_entry, write_list};

/// Shared, URL-keyed audit cache with TTL expiry.
pub struct AuditCache {
    store: Arc<dyn KeyValueStore>,
    ttl_ms: i64,
}

impl AuditCache {
    /// Create a cache over `store` with the given entry lifetime.
    pub fn new(store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self {
            store,
            ttl_ms: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
        }
    }

    pub fn from_config(store: Arc<dyn KeyValueStore>, config: &CacheConfig) -> Self {
        Self::new(store, Duration::from_secs(config.global_ttl_secs))
    }

    /// Store `result`, superseding any entry for the same URL.
    pub fn save(&self, result: &AuditResult) {
        let Some(entry) = to_entry(result) else {
            return;
        };
        let mut entries = self.entries();
        entries.retain(|e| entry_url(e) != Some(result.website_url.as_str()));
        entries.push(entry);
        debug!(url = %result.website_url, total = entries.len(), "Caching audit");
        write_list(self.store.as_ref(), AUDIT_RESULTS_KEY, &entries);
    }

    /// Look up a fresh entry for `url`.
    ///
    /// An expired entry is evicted and reported as absent.
    pub fn load(&self, url: &str) -> Option<AuditResult> {
        let mut entries = self.entries();
        let idx = entries.iter().position(|e| entry_url(e) == Some(url))?;

        if is_expired(now_ms(), entry_generated_at(&entries[idx]), self.ttl_ms) {
            debug!(url, "Cached audit expired, removing");
            entries.remove(idx);
            write_list(self.store.as_ref(), AUDIT_RESULTS_KEY, &entries);
            return None;
        }

        debug!(url, "Audit cache hit");
        from_entry(entries.swap_remove(idx))
    }

    /// Evict every expired entry. Returns how many were removed; the store
    /// is not written when nothing expired.
    pub fn clear_expired(&self) -> usize {
        let now = now_ms();
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|e| !is_expired(now, entry_generated_at(e), self.ttl_ms));
        let removed = before - entries.len();
        if removed > 0 {
            debug!(removed, "Evicted expired audits");
            write_list(self.store.as_ref(), AUDIT_RESULTS_KEY, &entries);
        }
        removed
    }

    /// Number of stored entries, fresh or not.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries(&self) -> Vec<Value> {
        read_list(self.store.as_ref(), AUDIT_RESULTS_KEY)
    }
}

fn entry_url(entry: &Value) -> Option<&str> {
    entry.get("websiteUrl").and_then(Value::as_str)
}
