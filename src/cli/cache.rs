//! Global cache command handler.

use anyhow::Result;

use cro_auditor::config::Config;
use cro_auditor::AuditCache;

use super::{open_store, CacheAction};

pub(crate) fn cmd_cache(config: Config, action: CacheAction) -> Result<()> {
    let cache = AuditCache::from_config(open_store(&config), &config.cache);
    match action {
        CacheAction::Prune => {
            let removed = cache.clear_expired();
            println!(
                "Pruned {} expired audit(s); {} remain cached.",
                removed,
                cache.len()
            );
        }
    }
    Ok(())
}
