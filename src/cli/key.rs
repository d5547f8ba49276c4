//! API key command handler.

use anyhow::Result;

use cro_auditor::config::Config;

use super::{session_for, KeyAction};

/// Manage the stored API key (global, or per user with `--user`).
pub(crate) fn cmd_key(config: Config, action: KeyAction) -> Result<()> {
    match action {
        KeyAction::Set { value, user } => {
            if value.trim().is_empty() {
                anyhow::bail!("API key must not be empty");
            }
            let session = session_for(&config, user);
            if !session.set_api_key(&value) {
                anyhow::bail!("Failed to store API key; see logs for details");
            }
            println!("API key stored{}.", scope_label(session.user_id()));
        }
        KeyAction::Show { user } => {
            let session = session_for(&config, user);
            match session.api_key() {
                Some(key) => println!("{}{}", mask_key(&key), scope_label(session.user_id())),
                None => println!("No API key stored{}.", scope_label(session.user_id())),
            }
        }
        KeyAction::Clear { user } => {
            let session = session_for(&config, user);
            if !session.clear_api_key() {
                anyhow::bail!("Failed to clear API key; see logs for details");
            }
            println!("API key removed{}.", scope_label(session.user_id()));
        }
    }
    Ok(())
}

fn scope_label(user: Option<&str>) -> String {
    match user {
        Some(id) => format!(" for user '{}'", id),
        None => String::new(),
    }
}

/// Keep the prefix and last four characters visible.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("sk-abcdefghijklmnop"), "sk-...mnop");
        assert_eq!(mask_key("short"), "*****");
    }

    #[test]
    fn test_scope_label() {
        assert_eq!(scope_label(None), "");
        assert_eq!(scope_label(Some("u1")), " for user 'u1'");
    }
}
