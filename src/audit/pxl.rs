//! PXL test prioritization.
//!
//! Each test idea earns points for visibility, magnitude and ease:
//!
//! | criterion              | points |
//! |------------------------|--------|
//! | above the fold         | 1      |
//! | noticeable within 5 s  | 2      |
//! | adds or removes        | 2      |
//! | high-traffic page      | 1      |
//! | addresses an issue     | 1      |
//! | ease: easy/medium/hard | 3/1/0  |
//!
//! The score is always recomputed here; a `score` sent by the model is
//! advisory and discarded.

use super::types::{Ease, PxlItem};

/// Highest achievable PXL score.
pub const MAX_PXL_SCORE: u8 = 10;

/// Compute the PXL score from an item's criteria.
pub fn compute_score(item: &PxlItem) -> u8 {
    let mut score = 0;
    if item.is_above_fold {
        score += 1;
    }
    if item.is_noticeable_in5_sec {
        score += 2;
    }
    if item.adds_or_removes {
        score += 2;
    }
    if item.high_traffic {
        score += 1;
    }
    if item.addressed_issue {
        score += 1;
    }
    score + ease_bonus(item.ease_of_implementation)
}

fn ease_bonus(ease: Ease) -> u8 {
    match ease {
        Ease::Easy => 3,
        Ease::Medium => 1,
        Ease::Hard => 0,
    }
}

/// Overwrite every item's `score` with the computed value.
pub fn rescore(items: &mut [PxlItem]) {
    for item in items.iter_mut() {
        item.score = compute_score(item);
    }
}

/// Items ordered by descending score; ties keep their original order.
pub fn ranked(items: &[PxlItem]) -> Vec<PxlItem> {
    let mut sorted: Vec<PxlItem> = items
        .iter()
        .cloned()
        .map(|mut item| {
            item.score = compute_score(&item);
            item
        })
        .collect();
    sorted.sort_by(|a, b| b.score.cmp(&a.score));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, ease: Ease, flags: [bool; 5]) -> PxlItem {
        PxlItem {
            id: id.to_string(),
            title: format!("Test {id}"),
            hypothesis: String::new(),
            is_above_fold: flags[0],
            is_noticeable_in5_sec: flags[1],
            adds_or_removes: flags[2],
            high_traffic: flags[3],
            addressed_issue: flags[4],
            ease_of_implementation: ease,
            score: 0,
        }
    }

    #[test]
    fn test_all_criteria_easy_scores_ten() {
        let it = item("a", Ease::Easy, [true; 5]);
        assert_eq!(compute_score(&it), 10);
        assert_eq!(compute_score(&it), MAX_PXL_SCORE);
    }

    #[test]
    fn test_nothing_hard_scores_zero() {
        assert_eq!(compute_score(&item("a", Ease::Hard, [false; 5])), 0);
    }

    #[test]
    fn test_medium_ease_bonus() {
        let it = item("a", Ease::Medium, [false, true, false, false, false]);
        assert_eq!(compute_score(&it), 3);
    }

    #[test]
    fn test_rescore_overwrites_model_score() {
        let mut items = vec![item("a", Ease::Hard, [true, false, false, false, false])];
        items[0].score = 9;
        rescore(&mut items);
        assert_eq!(items[0].score, 1);
    }

    #[test]
    fn test_ranked_descending_and_stable() {
        let items = vec![
            item("low", Ease::Hard, [false; 5]),
            item("top", Ease::Easy, [true; 5]),
            item("mid1", Ease::Medium, [false; 5]),
            item("mid2", Ease::Medium, [false; 5]),
        ];
        let ids: Vec<String> = ranked(&items).into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["top", "mid1", "mid2", "low"]);
    }
}
