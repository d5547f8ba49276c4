//! Audit data model.
//!
//! Serialized field names are camelCase to match the persisted layout and
//! the JSON contract with the model. Enumerations that the model fills in
//! ([`Level`], [`Ease`]) deserialize leniently and never fail; free-text
//! fields accept any scalar and default to empty.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{AuditError, Result};

use super::normalize::normalize_level;

static TARGET_MARKET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9\s\-,]+$").unwrap());

/// Maximum length of a target market description.
pub const MAX_TARGET_MARKET_LEN: usize = 50;

// ── Enumerations ─────────────────────────────────────────────────────────────

/// Three-valued rating used for impact, effort and priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Level {
    High,
    Medium,
    Low,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(normalize_level(&raw))
    }
}

/// Kind of website being audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WebsiteType {
    #[serde(rename = "E-commerce")]
    Ecommerce,
    #[serde(rename = "Lead Generation")]
    LeadGeneration,
}

impl WebsiteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ecommerce => "E-commerce",
            Self::LeadGeneration => "Lead Generation",
        }
    }
}

impl fmt::Display for WebsiteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WebsiteType {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self> {
        let folded: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match folded.as_str() {
            "ecommerce" => Ok(Self::Ecommerce),
            "leadgeneration" | "leadgen" => Ok(Self::LeadGeneration),
            _ => Err(AuditError::Validation(format!(
                "Website type must be 'E-commerce' or 'Lead Generation', got '{}'",
                s
            ))),
        }
    }
}

/// Depth of the audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AuditMode {
    #[default]
    Basic,
    Advanced,
}

impl AuditMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for AuditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditMode {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "advanced" => Ok(Self::Advanced),
            _ => Err(AuditError::Validation(format!(
                "Mode must be 'Basic' or 'Advanced', got '{}'",
                s
            ))),
        }
    }
}

/// Implementation difficulty of a PXL test idea.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Ease {
    Easy,
    Medium,
    #[default]
    Hard,
}

impl Ease {
    /// Map loose model output onto the scale. Low effort counts as easy.
    pub fn from_loose(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "easy" | "low" => Self::Easy,
            "medium" | "med" => Self::Medium,
            _ => Self::Hard,
        }
    }
}

impl<'de> Deserialize<'de> for Ease {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(Self::from_loose(raw.as_str().unwrap_or_default()))
    }
}

// ── Request ──────────────────────────────────────────────────────────────────

/// A validated audit submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRequest {
    website_url: String,
    website_type: WebsiteType,
    target_market: String,
    mode: Option<AuditMode>,
}

impl AuditRequest {
    /// Validate and build a request.
    ///
    /// The URL must parse with an `http` or `https` scheme; the target
    /// market must be 1–50 characters of letters, digits, spaces, hyphens
    /// and commas.
    pub fn new(
        website_url: &str,
        website_type: WebsiteType,
        target_market: &str,
        mode: Option<AuditMode>,
    ) -> Result<Self> {
        let website_url = website_url.trim();
        if !is_valid_url(website_url) {
            return Err(AuditError::Validation(format!(
                "Please enter a valid http(s) URL, got '{}'",
                website_url
            )));
        }
        if !is_valid_target_market(target_market) {
            return Err(AuditError::Validation(format!(
                "Target market must be 1-{} letters, digits, spaces, hyphens or commas",
                MAX_TARGET_MARKET_LEN
            )));
        }
        Ok(Self {
            website_url: website_url.to_string(),
            website_type,
            target_market: target_market.to_string(),
            mode,
        })
    }

    pub fn website_url(&self) -> &str {
        &self.website_url
    }

    pub fn website_type(&self) -> WebsiteType {
        self.website_type
    }

    pub fn target_market(&self) -> &str {
        &self.target_market
    }

    pub fn mode(&self) -> Option<AuditMode> {
        self.mode
    }
}

fn is_valid_url(raw: &str) -> bool {
    match url::Url::parse(raw) {
        Ok(u) => matches!(u.scheme(), "http" | "https") && u.host().is_some(),
        Err(_) => false,
    }
}

fn is_valid_target_market(raw: &str) -> bool {
    let len = raw.chars().count();
    (1..=MAX_TARGET_MARKET_LEN).contains(&len) && TARGET_MARKET_RE.is_match(raw)
}

// ── Result sections ──────────────────────────────────────────────────────────

/// One model-produced recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecommendation {
    #[serde(default, deserialize_with = "loose_string")]
    pub id: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub observation: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub strengths: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub suggested_improvement: String,
    #[serde(default = "default_level")]
    pub impact: Level,
    #[serde(default = "default_level")]
    pub effort: Level,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Level>,
    #[serde(default, deserialize_with = "loose_string")]
    pub section: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub page_type: String,
}

/// A low-effort change. Always normalized before it reaches this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickWin {
    #[serde(default, deserialize_with = "loose_string")]
    pub id: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub change: String,
    #[serde(default = "default_level")]
    pub effort: Level,
    #[serde(default = "default_level")]
    pub impact: Level,
    #[serde(default = "default_level")]
    pub priority: Level,
}

/// An A/B test idea. Older prompts used `title`/`hypothesis`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbTest {
    #[serde(default, deserialize_with = "loose_string")]
    pub id: String,
    #[serde(default, alias = "title", deserialize_with = "loose_string")]
    pub test_name: String,
    #[serde(default, alias = "hypothesis", deserialize_with = "loose_string")]
    pub friction_point: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub expected_lift: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub description: String,
    #[serde(default, rename = "variantA", skip_serializing_if = "Option::is_none")]
    pub variant_a: Option<String>,
    #[serde(default, rename = "variantB", skip_serializing_if = "Option::is_none")]
    pub variant_b: Option<String>,
}

/// A group of heuristic checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicCategory {
    #[serde(default, deserialize_with = "loose_string")]
    pub category: String,
    #[serde(default)]
    pub items: Vec<HeuristicItem>,
}

impl HeuristicCategory {
    /// Mean item score, `None` for an empty category.
    pub fn average_score(&self) -> Option<f64> {
        if self.items.is_empty() {
            return None;
        }
        let total: u32 = self.items.iter().map(|i| u32::from(i.score)).sum();
        Some(f64::from(total) / self.items.len() as f64)
    }
}

/// A single heuristic check, scored 0–3 (3 is best).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicItem {
    #[serde(default, deserialize_with = "loose_string")]
    pub question: String,
    #[serde(default, deserialize_with = "heuristic_score")]
    pub score: u8,
    #[serde(default, deserialize_with = "loose_string")]
    pub observation: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub recommendation: String,
}

/// Highest heuristic item score.
pub const MAX_HEURISTIC_SCORE: u8 = 3;

/// A test idea scored with the PXL framework.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PxlItem {
    #[serde(default, deserialize_with = "loose_string")]
    pub id: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub title: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub hypothesis: String,
    #[serde(default, deserialize_with = "loose_bool")]
    pub is_above_fold: bool,
    #[serde(
        default,
        rename = "isNoticeableIn5Sec",
        deserialize_with = "loose_bool"
    )]
    pub is_noticeable_in5_sec: bool,
    #[serde(default, deserialize_with = "loose_bool")]
    pub adds_or_removes: bool,
    #[serde(default, deserialize_with = "loose_bool")]
    pub high_traffic: bool,
    #[serde(default, deserialize_with = "loose_bool")]
    pub addressed_issue: bool,
    #[serde(default)]
    pub ease_of_implementation: Ease,
    /// Derived; whatever the model sent is overwritten.
    #[serde(default, deserialize_with = "ignored_score")]
    pub score: u8,
}

// ── Aggregate ────────────────────────────────────────────────────────────────

/// A complete, normalized audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    pub id: String,
    pub website_url: String,
    pub website_type: WebsiteType,
    pub target_market: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<AuditMode>,
    #[serde(default)]
    pub recommendations: Vec<AuditRecommendation>,
    #[serde(default)]
    pub quick_wins: Vec<QuickWin>,
    #[serde(default)]
    pub ab_tests: Vec<AbTest>,
    #[serde(default)]
    pub introduction: String,
    /// Epoch milliseconds at assembly time.
    pub generated_at: i64,
    #[serde(default)]
    pub heuristic_analysis: Vec<HeuristicCategory>,
    #[serde(default)]
    pub pxl_tests: Vec<PxlItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mock_design: Option<String>,
}

impl AuditResult {
    /// Whether this result was produced for the same submission.
    pub fn matches_request(&self, request: &AuditRequest) -> bool {
        self.website_url == request.website_url()
            && self.website_type == request.website_type()
            && self.target_market == request.target_market()
            && self.mode.unwrap_or_default() == request.mode().unwrap_or_default()
    }
}

// ── Lenient field helpers ────────────────────────────────────────────────────

fn default_level() -> Level {
    Level::Medium
}

/// Render a scalar JSON value as text; null and containers become empty.
pub(crate) fn loose_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "true".to_string(),
        _ => String::new(),
    }
}

fn loose_string<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    Ok(loose_text(&raw))
}

fn loose_bool<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    Ok(match raw {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "y"),
        _ => false,
    })
}

fn heuristic_score<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u8, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    let score = match raw {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(score.round().clamp(0.0, f64::from(MAX_HEURISTIC_SCORE)) as u8)
}

fn ignored_score<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u8, D::Error> {
    let _ = Value::deserialize(deserializer)?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_accepts_valid_input() {
        let req = AuditRequest::new(
            "https://shop.example",
            WebsiteType::Ecommerce,
            "US, Canada",
            Some(AuditMode::Basic),
        )
        .unwrap();
        assert_eq!(req.website_url(), "https://shop.example");
        assert_eq!(req.target_market(), "US, Canada");
    }

    #[test]
    fn test_request_rejects_bad_scheme() {
        let err = AuditRequest::new("ftp://shop.example", WebsiteType::Ecommerce, "US", None)
            .unwrap_err();
        assert!(matches!(err, AuditError::Validation(_)));
        assert!(AuditRequest::new("shop.example", WebsiteType::Ecommerce, "US", None).is_err());
    }

    #[test]
    fn test_request_rejects_bad_market() {
        for market in ["", "US!", &"x".repeat(51)] {
            assert!(
                AuditRequest::new("https://a.example", WebsiteType::Ecommerce, market, None)
                    .is_err(),
                "market {market:?} should be rejected"
            );
        }
        assert!(AuditRequest::new(
            "https://a.example",
            WebsiteType::Ecommerce,
            &"x".repeat(50),
            None
        )
        .is_ok());
    }

    #[test]
    fn test_website_type_parsing() {
        assert_eq!(
            "E-commerce".parse::<WebsiteType>().unwrap(),
            WebsiteType::Ecommerce
        );
        assert_eq!(
            "lead-generation".parse::<WebsiteType>().unwrap(),
            WebsiteType::LeadGeneration
        );
        assert!("blog".parse::<WebsiteType>().is_err());
    }

    #[test]
    fn test_website_type_serde_names() {
        assert_eq!(
            serde_json::to_string(&WebsiteType::LeadGeneration).unwrap(),
            r#""Lead Generation""#
        );
        let t: WebsiteType = serde_json::from_str(r#""E-commerce""#).unwrap();
        assert_eq!(t, WebsiteType::Ecommerce);
    }

    #[test]
    fn test_level_deserialize_is_total() {
        let levels: Vec<Level> =
            serde_json::from_value(json!(["high", "LOW", "med", "", null, 7, "xyz"])).unwrap();
        assert_eq!(
            levels,
            vec![
                Level::High,
                Level::Low,
                Level::Medium,
                Level::Medium,
                Level::Medium,
                Level::Medium,
                Level::Medium
            ]
        );
    }

    #[test]
    fn test_ab_test_accepts_legacy_aliases() {
        let t: AbTest = serde_json::from_value(json!({
            "id": "test_1",
            "title": "Headline test",
            "hypothesis": "Clearer headline lifts signups",
            "variantA": "Old",
            "variantB": "New"
        }))
        .unwrap();
        assert_eq!(t.test_name, "Headline test");
        assert_eq!(t.friction_point, "Clearer headline lifts signups");
        assert_eq!(t.variant_b.as_deref(), Some("New"));
        assert_eq!(t.expected_lift, "");
    }

    #[test]
    fn test_heuristic_score_clamped() {
        let item: HeuristicItem =
            serde_json::from_value(json!({"question": "q", "score": 7})).unwrap();
        assert_eq!(item.score, 3);
        let item: HeuristicItem =
            serde_json::from_value(json!({"question": "q", "score": "2"})).unwrap();
        assert_eq!(item.score, 2);
        let item: HeuristicItem =
            serde_json::from_value(json!({"question": "q", "score": -1})).unwrap();
        assert_eq!(item.score, 0);
    }

    #[test]
    fn test_recommendation_tolerates_numeric_id_and_missing_fields() {
        let rec: AuditRecommendation =
            serde_json::from_value(json!({"id": 3, "impact": "high"})).unwrap();
        assert_eq!(rec.id, "3");
        assert_eq!(rec.impact, Level::High);
        assert_eq!(rec.effort, Level::Medium);
        assert!(rec.observation.is_empty());
    }

    #[test]
    fn test_ease_from_loose() {
        assert_eq!(Ease::from_loose("Easy"), Ease::Easy);
        assert_eq!(Ease::from_loose("Low"), Ease::Easy);
        assert_eq!(Ease::from_loose("Medium"), Ease::Medium);
        assert_eq!(Ease::from_loose("whatever"), Ease::Hard);
    }

    #[test]
    fn test_category_average() {
        let cat = HeuristicCategory {
            category: "Value Proposition".into(),
            items: vec![
                HeuristicItem {
                    question: "a".into(),
                    score: 3,
                    observation: String::new(),
                    recommendation: String::new(),
                },
                HeuristicItem {
                    question: "b".into(),
                    score: 0,
                    observation: String::new(),
                    recommendation: String::new(),
                },
            ],
        };
        assert_eq!(cat.average_score(), Some(1.5));
    }
}
