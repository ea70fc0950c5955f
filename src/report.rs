//! Plain-text report rendering.
//!
//! Reports are plain strings suitable for piping or pasting; terminal color
//! stays in the command layer.

use crate::collection::TopPicks;
use crate::profit::ProfitEstimate;
use crate::record::{SavedItem, ScoredRecord};

/// Shorten a display string to at most `max` characters
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let cut: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}

fn push_if(lines: &mut Vec<String>, label: &str, value: &str) {
    if !value.is_empty() {
        lines.push(format!("{label}: {value}"));
    }
}

/// Copyable one-record summary
pub fn record_summary(scored: &ScoredRecord) -> String {
    let r = &scored.record;
    let mut lines = Vec::new();
    lines.push(format!("Title: {}", r.title));
    push_if(&mut lines, "ASIN", &r.asin);
    push_if(&mut lines, "Variant", &r.selected_variant);
    if !r.price.display.is_empty() {
        let range_note = if r.price.is_range { " (range)" } else { "" };
        lines.push(format!("Price: {}{}", r.price.display, range_note));
    }
    push_if(&mut lines, "Rating", &r.rating);
    push_if(&mut lines, "Reviews", &r.review_count_text);
    push_if(&mut lines, "Rank", &r.rank);
    lines.push(format!("Opportunity: {}/100", scored.opportunity.score));
    lines.push(format!("Content: {}/100", scored.content.score));
    lines.join("\n")
}

/// Copyable side-by-side compare summary, one block per item
pub fn compare_text(items: &[&SavedItem]) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Compare ({} items):", items.len()));
    lines.push("---".to_string());
    for (idx, it) in items.iter().enumerate() {
        lines.push(format!("#{} {}", idx + 1, it.title));
        push_if(&mut lines, "ASIN", &it.asin);
        push_if(&mut lines, "Variant", &it.selected_variant);
        if !it.price.is_empty() {
            let range_note = if it.price_is_range { " (range)" } else { "" };
            lines.push(format!("Price: {}{}", it.price, range_note));
        }
        push_if(&mut lines, "Rating", &it.rating);
        push_if(&mut lines, "Reviews", &it.review_count_text);
        push_if(&mut lines, "Rank", &it.rank);
        if let Some(score) = it.opportunity_score {
            lines.push(format!("Opportunity: {score}/100"));
        }
        if let Some(score) = it.content_score {
            lines.push(format!("Content: {score}/100"));
        }
        push_if(&mut lines, "URL", &it.url);
        lines.push("---".to_string());
    }
    lines.join("\n")
}

/// One saved-list row; `compact` drops everything but title, price and score
pub fn saved_item_line(item: &SavedItem, compact: bool) -> String {
    let score = item
        .opportunity_score
        .map(|s| format!("{s}/100"))
        .unwrap_or_else(|| "—".to_string());
    let price = if item.price.is_empty() {
        "—".to_string()
    } else if item.price_is_range {
        format!("{} (range)", item.price)
    } else {
        item.price.clone()
    };
    if compact {
        format!("{:<50} {:>14}  opp {}", truncate(&item.title, 50), price, score)
    } else {
        let mut line = format!("{:<50} {:>14}  opp {}", truncate(&item.title, 50), price, score);
        if !item.rating.is_empty() {
            line.push_str(&format!("  {}", truncate(&item.rating, 20)));
        }
        if !item.rank.is_empty() {
            line.push_str(&format!("  {}", truncate(&item.rank, 40)));
        }
        line
    }
}

/// Footer naming the list's best opportunity and best demand rank
pub fn top_picks_lines(picks: &TopPicks<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(item) = picks.best_opportunity {
        let score = item
            .opportunity_score
            .map(|s| s.to_string())
            .unwrap_or_else(|| "—".to_string());
        lines.push(format!(
            "Best opportunity: {} ({score}/100)",
            truncate(&item.title, 60)
        ));
    }
    if let Some(item) = picks.best_demand {
        lines.push(format!(
            "Best demand rank: {} ({})",
            truncate(&item.title, 60),
            item.rank
        ));
    }
    lines
}

/// Profit-estimate rendering, fee breakdown included
pub fn profit_text(est: &ProfitEstimate) -> String {
    format!(
        "Net profit: ${:.2}\nROI: {:.1}%\nReferral: ${:.2} | Fulfillment: ${:.2} | Storage: ${:.2}",
        est.net, est.roi_pct, est.referral_fee, est.fulfillment_fee, est.storage_fee
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complaints::analyze_complaints;
    use crate::normalize::{normalize_price, NormalizedPrice};
    use crate::record::ProductRecord;
    use crate::score::{content_score, opportunity_score, OpportunitySignals};

    fn scored_fixture() -> ScoredRecord {
        let record = ProductRecord {
            url: "https://example.com/dp/B0TEST12345".to_string(),
            asin: "B0TEST12345".to_string(),
            title: "Stainless Steel Insulated Water Bottle 32oz".to_string(),
            brand: "Acme".to_string(),
            selected_variant: "Color: Black".to_string(),
            category: "Sports > Water Bottles".to_string(),
            bullets: vec!["Keeps drinks cold".to_string()],
            reviews: vec![],
            rating: "4.6 out of 5 stars".to_string(),
            review_count_text: "1,234 ratings".to_string(),
            rank: "#3,041 in Kitchen".to_string(),
            ships_from: String::new(),
            sold_by: String::new(),
            price: normalize_price("$24.99"),
        };
        let opportunity = opportunity_score(&OpportunitySignals {
            rating: &record.rating,
            review_count: Some(1234),
            rank: &record.rank,
        });
        let content = content_score(&record.title, &record.bullets, &record.brand);
        let complaints = analyze_complaints(&record.reviews);
        ScoredRecord {
            record,
            opportunity,
            content,
            complaints,
        }
    }

    #[test]
    fn test_record_summary_fields() {
        let summary = record_summary(&scored_fixture());
        assert!(summary.starts_with("Title: Stainless Steel"));
        assert!(summary.contains("ASIN: B0TEST12345"));
        assert!(summary.contains("Price: $24.99"));
        assert!(!summary.contains("(range)"));
        assert!(summary.contains("/100"));
    }

    #[test]
    fn test_record_summary_skips_empty_fields() {
        let mut scored = scored_fixture();
        scored.record.asin.clear();
        scored.record.selected_variant.clear();
        let summary = record_summary(&scored);
        assert!(!summary.contains("ASIN:"));
        assert!(!summary.contains("Variant:"));
    }

    #[test]
    fn test_compare_text_layout() {
        let scored = scored_fixture();
        let mut a = SavedItem::from_scored(&scored);
        a.price_is_range = true;
        let b = SavedItem::from_scored(&scored);
        let text = compare_text(&[&a, &b]);
        assert!(text.starts_with("Compare (2 items):\n---"));
        assert!(text.contains("#1 Stainless Steel"));
        assert!(text.contains("#2 Stainless Steel"));
        assert!(text.contains("$24.99 (range)"));
        assert!(text.ends_with("---"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        let long = "a".repeat(60);
        let cut = truncate(&long, 10);
        assert!(cut.chars().count() <= 10);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn test_saved_item_line_missing_price() {
        let scored = scored_fixture();
        let mut item = SavedItem::from_scored(&scored);
        item.price = NormalizedPrice::not_found().display;
        let line = saved_item_line(&item, true);
        assert!(line.contains("Price not found"));
    }
}
