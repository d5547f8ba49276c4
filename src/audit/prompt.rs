//! Prompt templates for the audit and mockup calls.
//!
//! The wording is opaque to the rest of the pipeline; only the JSON shape
//! requested here matters to the extractor and assembler.

use super::types::{AuditMode, AuditRequest, AuditResult, WebsiteType};

/// Stylesheet injected into generated mockups. The design prompt tells the
/// model which of these classes it may use.
pub const DESIGN_CSS: &str = r#"
:root { --primary: #00A3E0; --secondary: #00D2BE; --dark-bg: #0F172A; --card-bg: rgba(255, 255, 255, 0.05); --border: rgba(255, 255, 255, 0.1); --text-main: #F1F5F9; --text-muted: #94A3B8; }
body { font-family: 'Inter', sans-serif; background-color: var(--dark-bg); color: var(--text-main); line-height: 1.6; margin: 0; }
.container { max-width: 1000px; margin: 0 auto; padding: 0 20px; }
section { padding: 80px 0; border-bottom: 1px solid var(--border); }
h1, h2, h3 { font-family: 'Outfit', sans-serif; color: #fff; }
.framework-note { background: rgba(255, 243, 205, 0.1); border: 1px dashed #FFC107; color: #FFC107; padding: 8px 12px; font-size: 0.8rem; border-radius: 4px; margin-bottom: 16px; display: inline-block; }
.btn { display: inline-block; padding: 16px 32px; border-radius: 50px; background: linear-gradient(135deg, var(--primary) 0%, var(--secondary) 100%); color: white; text-decoration: none; font-weight: 600; border: none; cursor: pointer; }
.card { background: var(--card-bg); border: 1px solid var(--border); padding: 30px; border-radius: 12px; }
.grid-2 { display: grid; grid-template-columns: 1fr 1fr; gap: 40px; }
.grid-3 { display: grid; grid-template-columns: repeat(auto-fit, minmax(280px, 1fr)); gap: 24px; }
.stat { font-size: 2.5rem; font-weight: 800; color: var(--secondary); }
"#;

const HEURISTIC_PILLARS: [&str; 7] = [
    "Orient Upon Entrance (H1, message match)",
    "Minimize Distraction (layout, links)",
    "Value Proposition (why us?)",
    "Reduce Anxiety (trust, proof)",
    "Make it Easy (UX, CTA)",
    "Pricing & Offer",
    "Copywriting",
];

/// System message: the task specification and response schema.
pub fn system_prompt(website_type: WebsiteType) -> String {
    let pillars = HEURISTIC_PILLARS
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{}. {}", i + 1, p))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a conversion-rate-optimization team: strategist, psychologist, UX designer and copywriter.

Audit a {website_type} website.

STEP 1: HEURISTIC ANALYSIS. Score the site on exactly these pillars:
{pillars}

STEP 2: RECOMMENDATIONS. Produce specific, prioritized recommendations from the analysis.

Respond with a single JSON object and nothing else:
{{
  "introduction": "markdown executive summary",
  "heuristicAnalysis": [
    {{ "category": "1. Orient Upon Entrance",
       "items": [ {{ "question": "Does the H1 say what it is?", "score": 2, "observation": "...", "recommendation": "..." }} ] }}
  ],
  "recommendations": [
    {{ "id": "rec_1", "pageType": "Homepage", "section": "Hero",
       "observation": "...", "strengths": "...", "suggestedImprovement": "...",
       "impact": "High", "effort": "Low", "priority": "High" }}
  ],
  "quickWins": [
    {{ "id": "qw_1", "change": "...", "impact": "Medium", "effort": "Low", "priority": "High" }}
  ],
  "abTests": [
    {{ "id": "test_1", "testName": "...", "frictionPoint": "...", "expectedLift": "...", "description": "..." }}
  ],
  "pxlTests": [
    {{ "id": "pxl_1", "title": "...", "hypothesis": "...",
       "isAboveFold": true, "isNoticeableIn5Sec": true, "addsOrRemoves": false,
       "highTraffic": true, "addressedIssue": true, "easeOfImplementation": "Easy" }}
  ]
}}

Rules:
- Give 2-3 checks per heuristic pillar; "score" is 0-3 where 3 is best.
- "impact", "effort" and "priority" must be exactly High, Medium or Low.
- Every recommendation needs "observation", "strengths" and "suggestedImprovement"; the Homepage matters most.
- Include 3-4 high-impact PXL test ideas; "easeOfImplementation" is Easy, Medium or Hard."#,
        website_type = website_type,
        pillars = pillars,
    )
}

/// User message: the request parameters.
pub fn user_prompt(request: &AuditRequest) -> String {
    let mut prompt = format!(
        "Analyze this {} website: {}\nTarget Market: {}",
        request.website_type(),
        request.website_url(),
        request.target_market()
    );
    if let Some(mode) = request.mode() {
        prompt.push_str(&format!("\nAudit depth: {}", mode));
        if mode == AuditMode::Advanced {
            prompt.push_str(
                "\nThe heuristic analysis is mandatory at this depth; cover every pillar.",
            );
        }
    }
    prompt.push_str(
        "\n\nLive page content is not available. Infer the analysis from standard patterns \
         for this industry and the URL structure.",
    );
    prompt
}

/// System message for the mockup call.
pub const DESIGN_SYSTEM_PROMPT: &str = "You are an expert frontend developer and UX designer.";

/// User message for the mockup call.
pub fn design_prompt(result: &AuditResult) -> String {
    let summary = if result.introduction.trim().is_empty() {
        "Focus on conversion."
    } else {
        result.introduction.as_str()
    };
    format!(
        r#"We analyzed a {website_type} website ({url}).
Strategy summary:
{summary}

Create a high-fidelity HTML mockup of the complete new homepage.

Design system (CSS is injected for you): .container, .btn, .card, .grid-2, .grid-3, .framework-note, .stat on a dark theme.

Requirements:
- Return only <body> content: no <html>, <head> or <style>.
- Annotate design decisions with <div class="framework-note">...</div>.
- Sections: hero with benefit-driven headline and prominent CTA; three proof cards in a .grid-3 with a .stat each; a testimonial in a .grid-2; a final lead-capture card with an email field and a full-width .btn.

Output: JSON {{ "html": "<div>...</div>" }}"#,
        website_type = result.website_type,
        url = result.website_url,
        summary = summary,
    )
}

/// Wrap body markup in a standalone document with the design stylesheet.
pub fn wrap_mockup(body_html: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<style>{css}</style>
<link href="https://fonts.googleapis.com/css2?family=Inter:wght@300;400;600;700&family=Outfit:wght@400;600;800&display=swap" rel="stylesheet">
</head>
<body>
{body}
</body>
</html>"#,
        css = DESIGN_CSS,
        body = body_html,
    )
}
