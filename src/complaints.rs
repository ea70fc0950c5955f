//! Complaint clustering over review excerpts.
//!
//! Buckets are a declarative table (label + pattern list) consumed by one
//! generic matcher, so adding a bucket is a table edit, not new control flow.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// How many buckets the analysis reports
const TOP_BUCKETS: usize = 2;

struct Bucket {
    label: &'static str,
    patterns: Vec<Regex>,
}

fn bucket(label: &'static str, patterns: &[&str]) -> Bucket {
    Bucket {
        label,
        patterns: patterns
            .iter()
            .map(|p| Regex::new(p).expect("Invalid complaint regex pattern"))
            .collect(),
    }
}

/// Declaration order doubles as the tie-break order
static BUCKETS: Lazy<Vec<Bucket>> = Lazy::new(|| {
    vec![
        bucket(
            "Quality / breaks",
            &[r"broke|broken|cheap|poor quality|fell apart|defect|faulty|crack"],
        ),
        bucket(
            "Size / fit wrong",
            &[r"too small|too big|smaller|larger|fit|size runs"],
        ),
        bucket(
            "Shipping / packaging",
            &[r"late|shipping|arrived|package|packaging|damaged box"],
        ),
        bucket(
            "Instructions / confusing",
            &[r"instructions|confusing|hard to use|difficult|complicated"],
        ),
        bucket(
            "Missing parts",
            &[r"missing|didn't include|not included|no parts|incomplete"],
        ),
    ]
});

/// A complaint theme and how often its patterns matched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintHit {
    pub label: String,
    pub count: usize,
}

/// Count pattern matches per bucket across all reviews and report the top
/// themes. Zero-count buckets are dropped; ties keep declaration order.
pub fn analyze_complaints(reviews: &[String]) -> Vec<ComplaintHit> {
    let text = reviews.join("\n").to_lowercase();

    let mut hits: Vec<ComplaintHit> = BUCKETS
        .iter()
        .map(|b| ComplaintHit {
            label: b.label.to_string(),
            count: b
                .patterns
                .iter()
                .map(|re| re.find_iter(&text).count())
                .sum(),
        })
        .filter(|h| h.count > 0)
        .collect();

    // Stable sort keeps declaration order among equal counts
    hits.sort_by(|a, b| b.count.cmp(&a.count));
    hits.truncate(TOP_BUCKETS);
    hits
}
