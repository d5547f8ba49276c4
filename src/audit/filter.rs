//! Recommendation filtering and grouping for the dashboard.

use std::collections::BTreeSet;

use super::types::{AuditRecommendation, Level};

/// Active dashboard filters; `None` means "All".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationFilter {
    pub impact: Option<Level>,
    pub effort: Option<Level>,
    pub section: Option<String>,
}

impl RecommendationFilter {
    pub fn matches(&self, rec: &AuditRecommendation) -> bool {
        self.impact.map_or(true, |l| rec.impact == l)
            && self.effort.map_or(true, |l| rec.effort == l)
            && self.section.as_deref().map_or(true, |s| rec.section == s)
    }

    pub fn is_empty(&self) -> bool {
        self.impact.is_none() && self.effort.is_none() && self.section.is_none()
    }
}

/// Recommendations for one page type, in original order.
#[derive(Debug, Clone, PartialEq)]
pub struct PageGroup<'a> {
    pub page_type: &'a str,
    pub recommendations: Vec<&'a AuditRecommendation>,
}

/// Group filtered recommendations by page type.
///
/// Page types appear in first-seen order across the unfiltered list, so a
/// group can be present but empty when the filter removes all its rows.
pub fn group_by_page<'a>(
    recommendations: &'a [AuditRecommendation],
    filter: &RecommendationFilter,
) -> Vec<PageGroup<'a>> {
    let mut groups: Vec<PageGroup<'a>> = Vec::new();
    for rec in recommendations {
        let idx = match groups.iter().position(|g| g.page_type == rec.page_type) {
            Some(idx) => idx,
            None => {
                groups.push(PageGroup {
                    page_type: &rec.page_type,
                    recommendations: Vec::new(),
                });
                groups.len() - 1
            }
        };
        if filter.matches(rec) {
            groups[idx].recommendations.push(rec);
        }
    }
    groups
}

/// Distinct section labels, sorted.
pub fn available_sections(recommendations: &[AuditRecommendation]) -> Vec<&str> {
    recommendations
        .iter()
        .map(|r| r.section.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, page: &str, section: &str, impact: Level, effort: Level) -> AuditRecommendation {
        AuditRecommendation {
            id: id.to_string(),
            observation: String::new(),
            strengths: String::new(),
            suggested_improvement: String::new(),
            impact,
            effort,
            priority: None,
            section: section.to_string(),
            page_type: page.to_string(),
        }
    }

    fn sample() -> Vec<AuditRecommendation> {
        vec![
            rec("1", "Homepage", "Hero", Level::High, Level::Low),
            rec("2", "Checkout", "Form", Level::Medium, Level::High),
            rec("3", "Homepage", "Footer", Level::Low, Level::Low),
        ]
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let f = RecommendationFilter::default();
        assert!(f.is_empty());
        assert!(sample().iter().all(|r| f.matches(r)));
    }

    #[test]
    fn test_group_by_page_first_seen_order() {
        let recs = sample();
        let groups = group_by_page(&recs, &RecommendationFilter::default());
        let pages: Vec<&str> = groups.iter().map(|g| g.page_type).collect();
        assert_eq!(pages, vec!["Homepage", "Checkout"]);
        assert_eq!(groups[0].recommendations.len(), 2);
    }

    #[test]
    fn test_filters_combine() {
        let recs = sample();
        let filter = RecommendationFilter {
            impact: None,
            effort: Some(Level::Low),
            section: Some("Footer".to_string()),
        };
        let groups = group_by_page(&recs, &filter);
        assert_eq!(groups[0].recommendations.len(), 1);
        assert_eq!(groups[0].recommendations[0].id, "3");
        assert!(groups[1].recommendations.is_empty());
    }

    #[test]
    fn test_available_sections_sorted_unique() {
        let mut recs = sample();
        recs.push(rec("4", "Homepage", "Hero", Level::Low, Level::Low));
        assert_eq!(available_sections(&recs), vec!["Footer", "Form", "Hero"]);
    }
}
