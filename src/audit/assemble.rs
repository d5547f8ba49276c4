//! Turn parsed model output into an [`AuditResult`].

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{AuditError, Result};

use super::normalize::normalize_quick_wins;
use super::pxl;
use super::types::{AuditRequest, AuditResult};

/// Introduction used when the model leaves it out.
pub const DEFAULT_INTRODUCTION: &str = "Audit completed successfully.";

/// Combine a request with the parsed model payload.
///
/// Sections the model omits default to empty; quick wins are normalized;
/// PXL scores are recomputed; the result gets a fresh id and timestamp.
/// Fails with [`AuditError::EmptyResult`] when there are no
/// recommendations, and with [`AuditError::Parse`] when a section is
/// present but not an array of objects.
pub fn assemble(request: &AuditRequest, parsed: &Value) -> Result<AuditResult> {
    let introduction = parsed
        .get("introduction")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(DEFAULT_INTRODUCTION)
        .to_string();

    let mut pxl_tests = section(parsed, "pxlTests")?;
    pxl::rescore(&mut pxl_tests);

    let result = AuditResult {
        id: uuid::Uuid::new_v4().to_string(),
        website_url: request.website_url().to_string(),
        website_type: request.website_type(),
        target_market: request.target_market().to_string(),
        mode: request.mode(),
        recommendations: section(parsed, "recommendations")?,
        quick_wins: normalize_quick_wins(parsed.get("quickWins")),
        ab_tests: section(parsed, "abTests")?,
        introduction,
        generated_at: chrono::Utc::now().timestamp_millis(),
        heuristic_analysis: section(parsed, "heuristicAnalysis")?,
        pxl_tests,
        mock_design: None,
    };

    if result.recommendations.is_empty() {
        return Err(AuditError::EmptyResult);
    }

    debug!(
        url = %result.website_url,
        recommendations = result.recommendations.len(),
        quick_wins = result.quick_wins.len(),
        ab_tests = result.ab_tests.len(),
        heuristics = result.heuristic_analysis.len(),
        pxl_tests = result.pxl_tests.len(),
        "Assembled audit"
    );
    Ok(result)
}

/// Deserialize an optional array section; absent or null means empty.
fn section<T: DeserializeOwned>(parsed: &Value, key: &str) -> Result<Vec<T>> {
    match parsed.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(raw) => serde_json::from_value(raw.clone())
            .map_err(|e| AuditError::Parse(format!("section '{}' is malformed: {}", key, e))),
    }
}
