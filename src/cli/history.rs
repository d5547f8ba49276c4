//! Audit history command handler.

use anyhow::Result;
use chrono::{Local, TimeZone};

use cro_auditor::config::Config;
use cro_auditor::AuditHistory;

use super::{open_store, HistoryAction};

/// Manage a user's audit history.
pub(crate) fn cmd_history(config: Config, action: HistoryAction) -> Result<()> {
    let history = AuditHistory::from_config(open_store(&config), &config.cache);

    match action {
        HistoryAction::List { user } => {
            let entries = history.load_all(&user);
            if entries.is_empty() {
                println!("No audit history found for '{}'.", user);
                return Ok(());
            }

            println!("Showing {} audit(s) for '{}':", entries.len(), user);
            for entry in &entries {
                println!(
                    "- {} | {} | {} | {} | {} recs | {}",
                    format_timestamp(entry.generated_at),
                    entry.website_url,
                    entry.website_type,
                    entry.mode.unwrap_or_default(),
                    entry.recommendations.len(),
                    entry.target_market
                );
            }
        }
        HistoryAction::Clear { user } => {
            history.clear(&user);
            println!("Cleared audit history for '{}'.", user);
        }
    }

    Ok(())
}

pub(crate) fn format_timestamp(epoch_ms: i64) -> String {
    match Local.timestamp_millis_opt(epoch_ms).single() {
        Some(ts) => ts.format("%Y-%m-%d %H:%M").to_string(),
        None => "unknown time".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp_shape() {
        let rendered = format_timestamp(1_700_000_000_000);
        assert_eq!(rendered.len(), "2023-11-14 22:13".len());
    }
}
