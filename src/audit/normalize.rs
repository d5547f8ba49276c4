//! Field normalization and legacy-record upgrade.
//!
//! The model (and results cached by older versions) hand us impact, effort
//! and priority as free text, and older quick wins carry a `cost` string
//! instead of an `effort` rating. Everything here is total: unknown input
//! falls back to [`Level::Medium`] rather than failing.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{AuditError, Result};

use super::types::{loose_text, AuditResult, Level, QuickWin};

static LOW_COST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"free|low|minor|quick|simple|<\s*\$?\s*100\b|under\s*\$?\s*100\b").unwrap()
});

static MEDIUM_COST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"medium|~|\$?100\s*-\s*\$?1000\b|\$?\b\d{2,3}\b").unwrap());

static HIGH_COST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"high|significant|substantial|>\s*\$?\s*1000\b|\$?\d{4,}").unwrap()
});

/// Map a loosely typed rating onto [`Level`].
///
/// Case-insensitive first letter: `h` → High, `l` → Low, `m` → Medium.
/// Anything else, including non-strings, is Medium.
pub fn normalize_level(raw: &Value) -> Level {
    match raw {
        Value::String(s) => level_from_str(s),
        _ => Level::Medium,
    }
}

/// String form of [`normalize_level`].
pub fn level_from_str(raw: &str) -> Level {
    match raw.trim_start().chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('h') => Level::High,
        Some('l') => Level::Low,
        _ => Level::Medium,
    }
}

/// Guess an effort rating from a free-text cost estimate.
///
/// Best effort only. Patterns are tried in order low, medium, high and the
/// first class that matches wins; thousands separators are ignored so
/// "$1,500" reads as a four-digit amount.
pub fn derive_effort_from_cost(raw: &Value) -> Level {
    let text = loose_text(raw).to_lowercase().replace(',', "");
    if text.trim().is_empty() {
        return Level::Medium;
    }
    if LOW_COST_RE.is_match(&text) {
        Level::Low
    } else if MEDIUM_COST_RE.is_match(&text) {
        Level::Medium
    } else if HIGH_COST_RE.is_match(&text) {
        Level::High
    } else {
        Level::Medium
    }
}

/// Normalize one raw quick win object.
///
/// An explicit, non-empty `effort` wins; otherwise effort is derived from
/// the legacy `cost` field.
pub fn normalize_quick_win(raw: &Value) -> QuickWin {
    let field = |name: &str| raw.get(name).unwrap_or(&Value::Null);
    let effort = match field("effort") {
        Value::Null => derive_effort_from_cost(field("cost")),
        Value::String(s) if s.trim().is_empty() => derive_effort_from_cost(field("cost")),
        explicit => normalize_level(explicit),
    };
    QuickWin {
        id: loose_text(field("id")),
        change: loose_text(field("change")),
        effort,
        impact: normalize_level(field("impact")),
        priority: normalize_level(field("priority")),
    }
}

/// Normalize a raw `quickWins` value; anything but an array yields none.
pub fn normalize_quick_wins(raw: Option<&Value>) -> Vec<QuickWin> {
    raw.and_then(Value::as_array)
        .map(|items| items.iter().map(normalize_quick_win).collect())
        .unwrap_or_default()
}

/// Upgrade a stored record of any schema version to the current shape.
///
/// Runs once when a record is read back from storage: quick wins are
/// normalized (deriving effort from legacy `cost`), absent optional
/// sections become empty, heuristic scores are clamped and PXL scores
/// recomputed. Applying it to its own output is a no-op.
pub fn upgrade_result(raw: Value) -> Result<AuditResult> {
    let Value::Object(mut fields) = raw else {
        return Err(AuditError::Parse("stored audit is not a JSON object".into()));
    };

    let quick_wins = normalize_quick_wins(fields.get("quickWins"));
    fields.insert(
        "quickWins".to_string(),
        serde_json::to_value(quick_wins).map_err(|e| AuditError::Parse(e.to_string()))?,
    );
    for key in ["recommendations", "abTests", "heuristicAnalysis", "pxlTests"] {
        fill_missing_array(&mut fields, key);
    }

    let mut result: AuditResult = serde_json::from_value(Value::Object(fields))
        .map_err(|e| AuditError::Parse(format!("stored audit has an unexpected shape: {}", e)))?;
    super::pxl::rescore(&mut result.pxl_tests);
    Ok(result)
}

fn fill_missing_array(fields: &mut Map<String, Value>, key: &str) {
    let present = matches!(fields.get(key), Some(Value::Array(_)));
    if !present {
        fields.insert(key.to_string(), Value::Array(Vec::new()));
    }
}
