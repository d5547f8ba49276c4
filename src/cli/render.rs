//! Plain-text audit dashboard.

use std::fmt::Write;

use cro_auditor::audit::filter::{available_sections, group_by_page};
use cro_auditor::audit::pxl::{ranked, MAX_PXL_SCORE};
use cro_auditor::audit::types::MAX_HEURISTIC_SCORE;
use cro_auditor::audit::{AuditResult, RecommendationFilter};

use super::history::format_timestamp;

pub(crate) fn print_dashboard(result: &AuditResult, filter: &RecommendationFilter) {
    print!("{}", dashboard(result, filter));
}

pub(crate) fn dashboard(result: &AuditResult, filter: &RecommendationFilter) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_dashboard(&mut out, result, filter);
    out
}

fn write_dashboard(
    out: &mut String,
    result: &AuditResult,
    filter: &RecommendationFilter,
) -> std::fmt::Result {
    writeln!(out, "CRO audit: {}", result.website_url)?;
    writeln!(
        out,
        "{} | {} | {} | generated {}",
        result.website_type,
        result.target_market,
        result.mode.unwrap_or_default(),
        format_timestamp(result.generated_at)
    )?;
    writeln!(out)?;
    writeln!(out, "{}", result.introduction.trim())?;

    // ── Recommendations ──────────────────────────────────────────────────
    writeln!(out)?;
    writeln!(out, "== Recommendations ({}) ==", result.recommendations.len())?;
    if !filter.is_empty() {
        writeln!(
            out,
            "Filters: impact={} effort={} section={}",
            filter.impact.map_or("all", |l| l.as_str()),
            filter.effort.map_or("all", |l| l.as_str()),
            filter.section.as_deref().unwrap_or("all")
        )?;
    }
    let sections = available_sections(&result.recommendations);
    if !sections.is_empty() {
        writeln!(out, "Sections: {}", sections.join(", "))?;
    }
    for group in group_by_page(&result.recommendations, filter) {
        if group.recommendations.is_empty() {
            continue;
        }
        writeln!(out)?;
        writeln!(out, "[{}]", group.page_type)?;
        for rec in group.recommendations {
            writeln!(
                out,
                "- ({} impact, {} effort) {}: {}",
                rec.impact, rec.effort, rec.section, rec.observation
            )?;
            if !rec.strengths.is_empty() {
                writeln!(out, "    Working: {}", rec.strengths)?;
            }
            writeln!(out, "    Change:  {}", rec.suggested_improvement)?;
        }
    }

    if !result.quick_wins.is_empty() {
        writeln!(out)?;
        writeln!(out, "== Quick wins ({}) ==", result.quick_wins.len())?;
        for win in &result.quick_wins {
            writeln!(
                out,
                "- [{} priority | {} impact | {} effort] {}",
                win.priority, win.impact, win.effort, win.change
            )?;
        }
    }

    if !result.ab_tests.is_empty() {
        writeln!(out)?;
        writeln!(out, "== A/B tests ({}) ==", result.ab_tests.len())?;
        for test in &result.ab_tests {
            writeln!(out, "- {} (expected lift: {})", test.test_name, test.expected_lift)?;
            writeln!(out, "    Friction: {}", test.friction_point)?;
            writeln!(out, "    {}", test.description)?;
            if let (Some(a), Some(b)) = (&test.variant_a, &test.variant_b) {
                writeln!(out, "    A: {}", a)?;
                writeln!(out, "    B: {}", b)?;
            }
        }
    }

    if !result.heuristic_analysis.is_empty() {
        writeln!(out)?;
        writeln!(out, "== Heuristic analysis ==")?;
        for category in &result.heuristic_analysis {
            match category.average_score() {
                Some(avg) => writeln!(
                    out,
                    "{} ({:.1}/{})",
                    category.category, avg, MAX_HEURISTIC_SCORE
                )?,
                None => writeln!(out, "{}", category.category)?,
            }
            for item in &category.items {
                writeln!(out, "- [{}/{}] {}", item.score, MAX_HEURISTIC_SCORE, item.question)?;
            }
        }
    }

    if !result.pxl_tests.is_empty() {
        writeln!(out)?;
        writeln!(out, "== PXL prioritization ==")?;
        for item in ranked(&result.pxl_tests) {
            writeln!(out, "- {:>2}/{} {}", item.score, MAX_PXL_SCORE, item.title)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cro_auditor::audit::{AuditRecommendation, Ease, Level, PxlItem, WebsiteType};

    fn rec(id: &str, page: &str, effort: Level) -> AuditRecommendation {
        AuditRecommendation {
            id: id.to_string(),
            observation: format!("observation {id}"),
            strengths: String::new(),
            suggested_improvement: "do better".to_string(),
            impact: Level::High,
            effort,
            priority: None,
            section: "Hero".to_string(),
            page_type: page.to_string(),
        }
    }

    fn pxl(title: &str, ease: Ease) -> PxlItem {
        PxlItem {
            id: title.to_string(),
            title: title.to_string(),
            hypothesis: String::new(),
            is_above_fold: true,
            is_noticeable_in5_sec: true,
            adds_or_removes: false,
            high_traffic: true,
            addressed_issue: false,
            ease_of_implementation: ease,
            score: 0,
        }
    }

    fn sample() -> AuditResult {
        let mut pxl_tests = vec![pxl("hard one", Ease::Hard), pxl("easy one", Ease::Easy)];
        cro_auditor::audit::pxl::rescore(&mut pxl_tests);
        AuditResult {
            id: "1".to_string(),
            website_url: "https://shop.example".to_string(),
            website_type: WebsiteType::Ecommerce,
            target_market: "US".to_string(),
            mode: None,
            recommendations: vec![rec("a", "Homepage", Level::Low), rec("b", "Checkout", Level::High)],
            quick_wins: Vec::new(),
            ab_tests: Vec::new(),
            introduction: "Intro".to_string(),
            generated_at: 0,
            heuristic_analysis: Vec::new(),
            pxl_tests,
            mock_design: None,
        }
    }

    #[test]
    fn test_dashboard_groups_by_page() {
        let text = dashboard(&sample(), &RecommendationFilter::default());
        assert!(text.contains("[Homepage]"));
        assert!(text.contains("[Checkout]"));
        assert!(!text.contains("Filters:"));
    }

    #[test]
    fn test_dashboard_applies_filter() {
        let filter = RecommendationFilter {
            effort: Some(Level::Low),
            ..RecommendationFilter::default()
        };
        let text = dashboard(&sample(), &filter);
        assert!(text.contains("observation a"));
        assert!(!text.contains("observation b"));
        assert!(text.contains("effort=Low"));
    }

    #[test]
    fn test_dashboard_ranks_pxl() {
        let text = dashboard(&sample(), &RecommendationFilter::default());
        let easy = text.find("easy one").unwrap();
        let hard = text.find("hard one").unwrap();
        assert!(easy < hard);
        assert!(text.contains(" 7/10 easy one"));
    }
}
