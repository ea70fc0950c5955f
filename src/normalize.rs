//! Free-text numeric normalization.
//!
//! Listing pages hand us prices, ratings, review counts and demand ranks as
//! display strings. Everything here turns those into structured values; a
//! string that yields nothing parses to `None` and callers fall through to a
//! neutral default, never an error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex pattern"));

/// Unsigned decimal number, thousands separators already stripped
static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+(\.[0-9]+)?").expect("Invalid number regex pattern"));

static INTEGER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+").expect("Invalid integer regex pattern"));

/// Demand rank as rendered: "#3,041 in Kitchen & Dining" (commas pre-stripped)
static RANK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#\s*([0-9]+)").expect("Invalid rank regex pattern"));

/// Phrases that mean the page is not showing a usable price. The pair form
/// requires both substrings in the same text.
const UNAVAILABLE_PHRASES: &[&str] = &["price in cart", "currently unavailable"];
const UNAVAILABLE_PAIR: (&str, &str) = ("see price", "add to cart");

/// Display text used when no probe produced a price
pub const PRICE_NOT_FOUND: &str = "Price not found";

/// Fallback display for carted prices that rendered as empty text
const PRICE_IN_CART: &str = "See price in cart";

/// A raw price string reduced to a canonical representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPrice {
    /// Whitespace-collapsed original text, case preserved
    pub display: String,
    /// First decimal number found, absent when the text had none or was unavailable
    pub numeric: Option<f64>,
    /// Two or more numbers joined by a hyphen or en-dash
    pub is_range: bool,
    /// Matched an unavailability phrase; overrides numeric extraction
    pub is_unavailable: bool,
}

impl NormalizedPrice {
    /// The value used when every probe missed
    pub fn not_found() -> Self {
        Self {
            display: PRICE_NOT_FOUND.to_string(),
            numeric: None,
            is_range: false,
            is_unavailable: false,
        }
    }

    /// True when this is the no-probe-succeeded sentinel or an empty display
    pub fn is_missing(&self) -> bool {
        self.display.is_empty() || self.display.eq_ignore_ascii_case(PRICE_NOT_FOUND)
    }
}

/// Collapse runs of whitespace into single spaces and trim
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

/// Normalize a raw price string.
///
/// Unavailability classification short-circuits numeric extraction, so
/// "Currently unavailable" never yields a number even if digits appear in the
/// surrounding text. Idempotent: re-normalizing the returned display gives the
/// same classification.
pub fn normalize_price(raw: &str) -> NormalizedPrice {
    let display = collapse_whitespace(raw);
    let lowered = display.to_lowercase();

    let unavailable = UNAVAILABLE_PHRASES.iter().any(|p| lowered.contains(p))
        || (lowered.contains(UNAVAILABLE_PAIR.0) && lowered.contains(UNAVAILABLE_PAIR.1));
    if unavailable {
        let display = if display.is_empty() {
            PRICE_IN_CART.to_string()
        } else {
            display
        };
        return NormalizedPrice {
            display,
            numeric: None,
            is_range: false,
            is_unavailable: true,
        };
    }

    let stripped = display.replace(',', "");
    let numbers: Vec<f64> = NUMBER_RE
        .find_iter(&stripped)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect();

    if numbers.is_empty() {
        return NormalizedPrice {
            display,
            numeric: None,
            is_range: false,
            is_unavailable: false,
        };
    }

    // Range detection: "$12.99 - $18.99" or "$12.99 – $18.99"
    let is_range = numbers.len() >= 2 && (display.contains('-') || display.contains('–'));

    NormalizedPrice {
        numeric: Some(numbers[0]),
        display,
        is_range,
        is_unavailable: false,
    }
}

/// Leading decimal from a rating string like "4.6 out of 5 stars"
pub fn parse_rating(text: &str) -> Option<f64> {
    NUMBER_RE.find(text)?.as_str().parse().ok()
}

/// Integer from a review-count string like "1,234 ratings"
pub fn parse_review_count(text: &str) -> Option<u64> {
    let stripped = text.replace(',', "");
    INTEGER_RE.find(&stripped)?.as_str().parse().ok()
}

/// Demand rank from a "#<number>" pattern like "#3,041 in Kitchen & Dining"
pub fn parse_rank(text: &str) -> Option<u64> {
    let stripped = text.replace(',', "");
    RANK_RE.captures(&stripped)?.get(1)?.as_str().parse().ok()
}

/// First decimal number from a money string like "$24.50"
pub fn money_to_num(text: &str) -> Option<f64> {
    let stripped = text.replace(',', "");
    NUMBER_RE.find(&stripped)?.as_str().parse().ok()
}
