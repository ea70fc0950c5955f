//! Domain types: inspected records, saved-list projections, list preferences.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::complaints::ComplaintHit;
use crate::normalize::NormalizedPrice;
use crate::score::ScoreResult;

/// At most this many bullets / review excerpts are kept per record
pub const MAX_BULLETS: usize = 10;
pub const MAX_REVIEWS: usize = 10;

/// Everything one inspection pass extracts from a listing. Immutable once
/// produced; a new inspection produces a new record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Source page URL
    pub url: String,
    /// Externally-supplied catalog id, empty when the URL had none
    #[serde(default)]
    pub asin: String,
    pub title: String,
    #[serde(default)]
    pub brand: String,
    /// Selected-variant label, e.g. "Color: Black | Size: Large"
    #[serde(default)]
    pub selected_variant: String,
    /// Category breadcrumb joined with " > "
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub bullets: Vec<String>,
    /// Review excerpts visible on the page
    #[serde(default)]
    pub reviews: Vec<String>,
    /// Rating display text, e.g. "4.6 out of 5 stars"
    #[serde(default)]
    pub rating: String,
    /// Review-count display text, e.g. "1,234 ratings"
    #[serde(default)]
    pub review_count_text: String,
    /// Demand-rank display text
    #[serde(default)]
    pub rank: String,
    #[serde(default)]
    pub ships_from: String,
    #[serde(default)]
    pub sold_by: String,
    /// Resolved price
    pub price: NormalizedPrice,
}

/// A record annotated with its derived scores. Scores are deterministic
/// functions of the record and never stored apart from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredRecord {
    pub record: ProductRecord,
    pub opportunity: ScoreResult,
    pub content: ScoreResult,
    pub complaints: Vec<ComplaintHit>,
}

/// The projection of a scored record that lives in the saved collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedItem {
    /// Dedup key, see [`saved_key`]
    pub key: String,
    #[serde(default)]
    pub asin: String,
    pub title: String,
    #[serde(default)]
    pub selected_variant: String,
    /// Price display text
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub price_is_range: bool,
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub review_count_text: String,
    #[serde(default)]
    pub rank: String,
    pub opportunity_score: Option<u8>,
    pub content_score: Option<u8>,
    #[serde(default)]
    pub url: String,
    /// Unix millis of the save action
    pub saved_at: i64,
}

/// Collection dedup key: catalog id (or a fixed placeholder), selected
/// variant and source URL. Two inspections of the same variant on the same
/// page replace each other.
pub fn saved_key(asin: &str, selected_variant: &str, url: &str) -> String {
    let id = if asin.is_empty() { "noasin" } else { asin };
    format!("{id}::{selected_variant}::{url}")
}

impl SavedItem {
    /// Project a scored record into its saved form, stamped now
    pub fn from_scored(scored: &ScoredRecord) -> Self {
        let r = &scored.record;
        Self {
            key: saved_key(&r.asin, &r.selected_variant, &r.url),
            asin: r.asin.clone(),
            title: r.title.clone(),
            selected_variant: r.selected_variant.clone(),
            price: r.price.display.clone(),
            price_is_range: r.price.is_range,
            rating: r.rating.clone(),
            review_count_text: r.review_count_text.clone(),
            rank: r.rank.clone(),
            opportunity_score: Some(scored.opportunity.score),
            content_score: Some(scored.content.score),
            url: r.url.clone(),
            saved_at: Utc::now().timestamp_millis(),
        }
    }
}

/// Sort orders for the saved list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum SortKey {
    /// Most recently saved first
    #[default]
    #[serde(rename = "savedAt_desc")]
    SavedAtDesc,
    /// Highest opportunity score first
    #[serde(rename = "opportunity_desc")]
    OpportunityDesc,
    /// Best (lowest) demand rank first
    #[serde(rename = "rank_asc")]
    RankAsc,
    /// Fewest reviews first
    #[serde(rename = "reviews_asc")]
    ReviewsAsc,
    /// Highest rating first
    #[serde(rename = "rating_desc")]
    RatingDesc,
    /// Cheapest first
    #[serde(rename = "price_asc")]
    PriceAsc,
    /// Most expensive first
    #[serde(rename = "price_desc")]
    PriceDesc,
}

/// Saved-list display and filter preferences. Stored as a partial document;
/// missing fields fall back to the defaults here on load.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListPreferences {
    pub sort: SortKey,
    pub compact: bool,
    /// Drop items whose rating parses below this (unparseable always fails)
    pub min_rating: Option<f64>,
    /// Drop items whose review count parses above this (unparseable always fails)
    pub max_reviews: Option<u64>,
    /// Drop items whose opportunity score is absent or below this
    pub min_opportunity: Option<u8>,
    /// Drop items with a missing price
    pub hide_no_price: bool,
    /// Drop range-priced items
    pub hide_range: bool,
}
