//! Listing-quality and market-opportunity heuristics.
//!
//! Both scores are additive bands clamped to [1, 100]. Absent signals (no
//! reviews, no demand rank) score neutral-favorable rather than being
//! penalized: absence usually means "not yet indexed", not "bad", and the
//! tool prefers surfacing candidates over under-reporting them.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::normalize::{parse_rank, parse_rating};

/// Attribute-signal patterns checked against the title: quantity terms,
/// unit/dimension terms, size words, color words
static ATTRIBUTE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)pack|pcs|pieces|count",
        r"(?i)inch|in\.|cm|mm|oz|lb|kg|g\b",
        r"(?i)size|small|medium|large|xl|xxl",
        r"(?i)color|black|white|red|blue|green|pink|gray|grey",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid attribute regex pattern"))
    .collect()
});

/// A heuristic score with one note per evaluated band, in evaluation order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u8,
    pub notes: Vec<String>,
}

fn clamp_score(score: i32) -> u8 {
    score.clamp(1, 100) as u8
}

/// Score the quality of listing text: title length, brand presence, bullet
/// coverage, keyword variety and attribute signals.
pub fn content_score(title: &str, bullets: &[String], brand: &str) -> ScoreResult {
    let title = title.trim();
    let mut score = 0i32;
    let mut notes = Vec::new();

    if title.len() >= 120 {
        score += 25;
        notes.push("Good title length (120+ chars).".to_string());
    } else if title.len() >= 80 {
        score += 18;
        notes.push("Decent title length (80+ chars).".to_string());
    } else if title.len() >= 50 {
        score += 10;
        notes.push("Short title (add key attributes).".to_string());
    } else {
        score += 5;
        notes.push("Very short title.".to_string());
    }

    if !brand.trim().is_empty() {
        score += 10;
        notes.push("Brand detected.".to_string());
    } else {
        notes.push("Brand not detected.".to_string());
    }

    if bullets.len() >= 5 {
        score += 20;
        notes.push("5+ bullet points detected.".to_string());
    } else if bullets.len() >= 3 {
        score += 12;
        notes.push("3-4 bullet points detected.".to_string());
    } else if !bullets.is_empty() {
        score += 6;
        notes.push("Few bullet points detected.".to_string());
    } else {
        notes.push("No bullet points detected.".to_string());
    }

    let words: Vec<String> = title
        .to_lowercase()
        .split_whitespace()
        .filter(|w| w.len() >= 4)
        .map(String::from)
        .collect();
    let unique: std::collections::HashSet<&String> = words.iter().collect();
    let unique_ratio = if words.is_empty() {
        0.0
    } else {
        unique.len() as f64 / words.len() as f64
    };
    if unique_ratio >= 0.75 {
        score += 20;
        notes.push("Good keyword variety.".to_string());
    } else if unique_ratio >= 0.6 {
        score += 12;
        notes.push("Moderate keyword variety.".to_string());
    } else {
        score += 6;
        notes.push("Title may be repetitive.".to_string());
    }

    if ATTRIBUTE_RES.iter().any(|re| re.is_match(title)) {
        score += 15;
        notes.push("Attributes detected (size/color/units).".to_string());
    } else {
        score += 6;
        notes.push("Few attributes detected.".to_string());
    }

    ScoreResult {
        score: clamp_score(score),
        notes,
    }
}

/// Inputs to the opportunity heuristic, as extracted from the listing
#[derive(Debug, Clone, Default)]
pub struct OpportunitySignals<'a> {
    /// Rating display text, e.g. "4.6 out of 5 stars"
    pub rating: &'a str,
    /// Parsed review count, `None` when absent or unparseable
    pub review_count: Option<u64>,
    /// Demand-rank display text, e.g. "#3,041 in Kitchen & Dining"
    pub rank: &'a str,
}

/// Estimate market favorability from rating, review volume and demand rank
pub fn opportunity_score(signals: &OpportunitySignals) -> ScoreResult {
    let rating = parse_rating(signals.rating).unwrap_or(0.0);
    let reviews = signals.review_count.unwrap_or(0);
    let rank = parse_rank(signals.rank);

    let mut score = 0i32;
    let mut notes = Vec::new();

    if rating >= 4.5 {
        score += 28;
        notes.push("Strong rating (4.5+).".to_string());
    } else if rating >= 4.2 {
        score += 22;
        notes.push("Good rating (4.2+).".to_string());
    } else if rating >= 3.9 {
        score += 15;
        notes.push("Okay rating (3.9+).".to_string());
    } else {
        score += 8;
        notes.push("Low rating risk.".to_string());
    }

    if reviews == 0 {
        score += 10;
        notes.push("Review count unknown/0.".to_string());
    } else if reviews < 200 {
        score += 30;
        notes.push("Low competition (<200 reviews).".to_string());
    } else if reviews < 800 {
        score += 20;
        notes.push("Medium competition (200-800).".to_string());
    } else {
        score += 10;
        notes.push("High competition (800+).".to_string());
    }

    match rank {
        None => {
            score += 8;
            notes.push("Demand rank not found.".to_string());
        }
        Some(r) if r < 5_000 => {
            score += 35;
            notes.push("Very strong demand (rank < 5k).".to_string());
        }
        Some(r) if r < 20_000 => {
            score += 28;
            notes.push("Strong demand (rank < 20k).".to_string());
        }
        Some(r) if r < 50_000 => {
            score += 18;
            notes.push("Moderate demand (rank < 50k).".to_string());
        }
        Some(_) => {
            score += 10;
            notes.push("Lower demand (rank 50k+).".to_string());
        }
    }

    ScoreResult {
        score: clamp_score(score),
        notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bullets(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Feature number {i}")).collect()
    }

    #[test]
    fn test_content_score_floor() {
        // Repetitive one-word vocabulary hits the lowest band on every axis
        let result = content_score("bottle bottle", &[], "");
        assert!(result.score <= 20, "floor score was {}", result.score);
        assert!(result.score >= 1);
        assert_eq!(result.notes.len(), 5);
    }

    #[test]
    fn test_content_score_single_token_counts_as_full_variety() {
        // One distinct token is a unique ratio of 1.0, so a bare word still
        // collects the variety band on top of the short-title floor
        let result = content_score("Short", &[], "");
        assert_eq!(result.score, 31);
    }

    #[test]
    fn test_content_score_rich_listing() {
        let title = "Acme Stainless Steel Water Bottle 32 oz Insulated Leakproof Travel Flask \
                     with Straw Lid, Black, 2 Pack for Gym Hiking Camping";
        assert!(title.len() >= 120);
        let result = content_score(title, &bullets(5), "Acme");
        assert!(result.score >= 80, "rich score was {}", result.score);
    }

    #[test]
    fn test_content_score_notes_in_evaluation_order() {
        let result = content_score("Tiny", &bullets(3), "Brand");
        assert_eq!(result.notes[0], "Very short title.");
        assert_eq!(result.notes[1], "Brand detected.");
        assert_eq!(result.notes[2], "3-4 bullet points detected.");
    }

    #[test]
    fn test_content_score_repetitive_title() {
        let title = "bottle bottle bottle bottle bottle bottle";
        let result = content_score(title, &[], "");
        assert!(result.notes.contains(&"Title may be repetitive.".to_string()));
    }

    #[test]
    fn test_content_score_empty_title_variety_is_zero() {
        // No tokens at all: the ratio is defined as 0, lowest variety band
        let result = content_score("", &[], "");
        assert!(result.notes.contains(&"Title may be repetitive.".to_string()));
    }

    #[test]
    fn test_opportunity_top_band() {
        let result = opportunity_score(&OpportunitySignals {
            rating: "4.8 out of 5 stars",
            review_count: Some(50),
            rank: "#3,000 in Kitchen",
        });
        // 28 + 30 + 35
        assert_eq!(result.score, 93);
    }

    #[test]
    fn test_opportunity_missing_signals_are_neutral() {
        let result = opportunity_score(&OpportunitySignals {
            rating: "No rating",
            review_count: None,
            rank: "No rank found",
        });
        // 8 + 10 + 8
        assert_eq!(result.score, 26);
        assert!(result.notes.contains(&"Demand rank not found.".to_string()));
    }

    #[test]
    fn test_opportunity_high_competition() {
        let result = opportunity_score(&OpportunitySignals {
            rating: "4.3",
            review_count: Some(12_000),
            rank: "#90,000 in Toys",
        });
        // 22 + 10 + 10
        assert_eq!(result.score, 42);
    }

    #[test]
    fn test_opportunity_rank_band_edges() {
        let at = |rank: &str| {
            opportunity_score(&OpportunitySignals {
                rating: "",
                review_count: None,
                rank,
            })
            .score
        };
        // 8 (rating) + 10 (reviews) + rank band
        assert_eq!(at("#4,999"), 53);
        assert_eq!(at("#5,000"), 46);
        assert_eq!(at("#19,999"), 46);
        assert_eq!(at("#49,999"), 36);
        assert_eq!(at("#50,000"), 28);
    }

    #[test]
    fn test_scores_never_exceed_bounds() {
        let title = "Acme Deluxe Premium Ultra Widget Collection Pack Large Inch Color Black \
                     Extra Bonus Gift Set Complete Edition With Everything Included Forever";
        let content = content_score(title, &bullets(9), "Acme");
        assert!(content.score <= 100);

        let opp = opportunity_score(&OpportunitySignals {
            rating: "5.0",
            review_count: Some(1),
            rank: "#1",
        });
        assert!(opp.score <= 100);
    }
}
