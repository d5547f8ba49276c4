//! Per-user audit history.
//!
//! Stored under `user_<id>_audit_results`, newest first, capped at
//! `history_limit` entries. Entries older than the history TTL (7 days by
//! default) are filtered out on every read and the pruned list is written
//! back.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::audit::AuditResult;
use crate::config::CacheConfig;
use crate::storage::{user_key, KeyValueStore, USER_AUDIT_RESULTS_KEY};

use super::{entry_generated_at, from_entry, is_expired, now_ms, read_list, to_entry, write_list};

pub struct AuditHistory {
    store: Arc<dyn KeyValueStore>,
    ttl_ms: i64,
    limit: usize,
}

impl AuditHistory {
    pub fn new(store: Arc<dyn KeyValueStore>, ttl: Duration, limit: usize) -> Self {
        Self {
            store,
            ttl_ms: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
            limit,
        }
    }

    pub fn from_config(store: Arc<dyn KeyValueStore>, config: &CacheConfig) -> Self {
        Self::new(
            store,
            Duration::from_secs(config.history_ttl_secs),
            config.history_limit,
        )
    }

    /// Record `result` as the newest entry for `user_id`, dropping the
    /// oldest entries beyond the limit.
    pub fn save(&self, user_id: &str, result: &AuditResult) {
        let Some(entry) = to_entry(result) else {
            return;
        };
        let mut entries = self.fresh_entries(user_id);
        entries.insert(0, entry);
        entries.truncate(self.limit);
        debug!(user_id, total = entries.len(), "Recording audit in user history");
        write_list(self.store.as_ref(), &key_for(user_id), &entries);
    }

    /// Every unexpired audit for `user_id`, newest first.
    pub fn load_all(&self, user_id: &str) -> Vec<AuditResult> {
        self.fresh_entries(user_id)
            .into_iter()
            .filter_map(from_entry)
            .collect()
    }

    /// Forget the user's history entirely.
    pub fn clear(&self, user_id: &str) {
        match self.store.remove(&key_for(user_id)) {
            Ok(()) => info!(user_id, "Cleared audit history"),
            Err(e) => warn!(user_id, "Failed to clear audit history: {}", e),
        }
    }

    /// Raw entries within the TTL; writes back when anything was pruned.
    fn fresh_entries(&self, user_id: &str) -> Vec<Value> {
        let key = key_for(user_id);
        let now = now_ms();
        let mut entries = read_list(self.store.as_ref(), &key);
        let before = entries.len();
        entries.retain(|e| !is_expired(now, entry_generated_at(e), self.ttl_ms));
        if entries.len() != before {
            debug!(user_id, pruned = before - entries.len(), "Pruned stale history");
            write_list(self.store.as_ref(), &key, &entries);
        }
        entries
    }
}

fn key_for(user_id: &str) -> String {
    user_key(user_id, USER_AUDIT_RESULTS_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::test_support::{result_for, DAY_MS, HOUR_MS};
    use crate::storage::MemoryStore;

    fn test_history() -> (AuditHistory, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let history = AuditHistory::from_config(store.clone(), &CacheConfig::default());
        (history, store)
    }

    #[test]
    fn test_history_is_newest_first() {
        let (history, _) = test_history();
        history.save("u1", &result_for("https://a.example", now_ms()));
        history.save("u1", &result_for("https://b.example", now_ms()));
        let all = history.load_all("u1");
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].website_url, "https://b.example");
    }

    #[test]
    fn test_eleventh_save_evicts_oldest() {
        let (history, _) = test_history();
        for i in 0..11 {
            history.save("u1", &result_for(&format!("https://{i}.example"), now_ms()));
        }
        let all = history.load_all("u1");
        assert_eq!(all.len(), 10);
        assert_eq!(all[0].website_url, "https://10.example");
        assert_eq!(all[9].website_url, "https://1.example");
    }

    #[test]
    fn test_stale_entries_pruned_and_written_back() {
        let (history, store) = test_history();
        history.save("u1", &result_for("https://old.example", now_ms() - 8 * DAY_MS));
        history.save("u1", &result_for("https://new.example", now_ms()));

        let all = history.load_all("u1");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].website_url, "https://new.example");

        let raw = store.get("user_u1_audit_results").unwrap().unwrap();
        assert!(!raw.contains("old.example"));
        assert!(store.get("user_u1_cro_audit_results").unwrap().is_none());
    }

    #[test]
    fn test_seven_day_boundary() {
        let (history, _) = test_history();
        history.save("u1", &result_for("https://stale.example", now_ms() - 7 * DAY_MS - 1));
        history.save("u1", &result_for("https://fresh.example", now_ms() - 7 * DAY_MS + HOUR_MS / 60));

        let urls: Vec<String> = history
            .load_all("u1")
            .into_iter()
            .map(|r| r.website_url)
            .collect();
        assert_eq!(urls, vec!["https://fresh.example".to_string()]);
    }

    #[test]
    fn test_users_are_isolated() {
        let (history, _) = test_history();
        history.save("u1", &result_for("https://a.example", now_ms()));
        assert!(history.load_all("u2").is_empty());
        history.clear("u1");
        assert!(history.load_all("u1").is_empty());
    }

    #[test]
    fn test_failing_store_is_non_fatal() {
        let history =
            AuditHistory::from_config(Arc::new(MemoryStore::failing()), &CacheConfig::default());
        history.save("u1", &result_for("https://a.example", now_ms()));
        history.clear("u1");
        assert!(history.load_all("u1").is_empty());
    }
}
