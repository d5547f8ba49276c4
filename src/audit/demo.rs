//! Canned result shown when no API credential is configured.

use std::time::Duration;

use super::types::{AbTest, AuditRecommendation, AuditRequest, AuditResult, Level, QuickWin};

/// Progress labels and the pause after each, replayed by the demo run.
pub const DEMO_STEPS: [(&str, Duration); 5] = [
    ("Analyzing homepage structure...", Duration::from_millis(800)),
    ("Evaluating navigation and user flow...", Duration::from_millis(600)),
    ("Reviewing conversion funnels...", Duration::from_millis(700)),
    ("Assessing mobile experience...", Duration::from_millis(500)),
    ("Generating recommendations...", Duration::from_millis(400)),
];

/// Build the demonstration audit for `request`.
pub fn demo_result(request: &AuditRequest) -> AuditResult {
    let introduction = format!(
        "# Demo Mode - Configure an API Key for Real Audits\n\n\
         This is a demonstration run. To get personalized recommendations for **{url}**, \
         store an OpenAI API key with `cro-auditor key set`.\n\n\
         With a valid key you will receive:\n\
         - 15-25 specific, actionable recommendations\n\
         - 8-12 quick wins\n\
         - 4-6 A/B test ideas with expected lift\n\
         - Analysis tailored to your {kind} website and the {market} market\n",
        url = request.website_url(),
        kind = request.website_type().as_str().to_lowercase(),
        market = request.target_market(),
    );

    AuditResult {
        id: uuid::Uuid::new_v4().to_string(),
        website_url: request.website_url().to_string(),
        website_type: request.website_type(),
        target_market: request.target_market().to_string(),
        mode: request.mode(),
        recommendations: vec![AuditRecommendation {
            id: "fallback-1".to_string(),
            observation: "API key not configured - showing demo recommendations".to_string(),
            strengths: "Clean website structure".to_string(),
            suggested_improvement:
                "Configure your OpenAI API key to get real, personalized audit recommendations"
                    .to_string(),
            impact: Level::High,
            effort: Level::Low,
            priority: None,
            section: "Homepage".to_string(),
            page_type: "Homepage".to_string(),
        }],
        quick_wins: vec![QuickWin {
            id: "qw-fallback-1".to_string(),
            change: "Configure OpenAI API key for real recommendations".to_string(),
            effort: Level::Low,
            impact: Level::High,
            priority: Level::High,
        }],
        ab_tests: vec![AbTest {
            id: "ab-fallback-1".to_string(),
            test_name: "API Integration Test".to_string(),
            friction_point: "Missing personalized recommendations".to_string(),
            expected_lift: "100% improvement in audit quality".to_string(),
            description: "Add your OpenAI API key to get real, contextual CRO recommendations"
                .to_string(),
            variant_a: None,
            variant_b: None,
        }],
        introduction,
        generated_at: chrono::Utc::now().timestamp_millis(),
        heuristic_analysis: Vec::new(),
        pxl_tests: Vec::new(),
        mock_design: None,
    }
}
