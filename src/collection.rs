//! Saved-collection operations: dedup upsert under tier quotas, filtering,
//! stable multi-key sorting, top picks and compare selection.
//!
//! Every operation is a pure function over an in-memory snapshot; callers
//! read the collection from the store, apply an operation and write the whole
//! document back.

use std::cmp::Ordering;

use crate::error::{ProspectError, Result};
use crate::normalize::{money_to_num, parse_rank, parse_rating, parse_review_count, PRICE_NOT_FOUND};
use crate::plan::{PlanState, FREE_SAVED_LIMIT, MAX_COMPARE};
use crate::record::{ListPreferences, SavedItem, SortKey};

/// What an upsert did to the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// New key, prepended
    Saved,
    /// Existing key, replaced in place
    Updated,
}

/// Insert or replace by key.
///
/// An existing key is replaced at its current position; a new key is
/// prepended. The free-tier saved-item quota applies only to new keys, so
/// re-saving an existing item always succeeds.
pub fn upsert(items: &mut Vec<SavedItem>, item: SavedItem, plan: &PlanState) -> Result<UpsertOutcome> {
    if let Some(existing) = items.iter_mut().find(|it| it.key == item.key) {
        *existing = item;
        return Ok(UpsertOutcome::Updated);
    }

    if !plan.effective_pro() && items.len() >= FREE_SAVED_LIMIT {
        return Err(ProspectError::QuotaExceeded {
            limit: FREE_SAVED_LIMIT,
        });
    }

    items.insert(0, item);
    Ok(UpsertOutcome::Saved)
}

/// Drop the item with `key`; returns whether anything was removed
pub fn remove(items: &mut Vec<SavedItem>, key: &str) -> bool {
    let before = items.len();
    items.retain(|it| it.key != key);
    items.len() != before
}

/// Empty the collection
pub fn clear(items: &mut Vec<SavedItem>) {
    items.clear();
}

/// True when the item passes every active filter. Filters left at their
/// empty default are not applied.
pub fn passes_filters(item: &SavedItem, prefs: &ListPreferences) -> bool {
    if prefs.hide_no_price {
        let lowered = item.price.to_lowercase();
        let no_price = item.price.is_empty() || lowered.contains(&PRICE_NOT_FOUND.to_lowercase());
        if no_price {
            return false;
        }
    }

    if prefs.hide_range && item.price_is_range {
        return false;
    }

    if let Some(min) = prefs.min_rating {
        match parse_rating(&item.rating) {
            Some(r) if r >= min => {}
            // Unparseable always fails a set threshold
            _ => return false,
        }
    }

    if let Some(max) = prefs.max_reviews {
        match parse_review_count(&item.review_count_text) {
            Some(n) if n <= max => {}
            _ => return false,
        }
    }

    if let Some(min) = prefs.min_opportunity {
        match item.opportunity_score {
            Some(s) if s >= min => {}
            _ => return false,
        }
    }

    true
}

/// Apply all active filters (AND logic)
pub fn apply_filters(items: &[SavedItem], prefs: &ListPreferences) -> Vec<SavedItem> {
    items
        .iter()
        .filter(|it| passes_filters(it, prefs))
        .cloned()
        .collect()
}

/// Compare two optional numeric keys with the uniform null policy: an item
/// whose value failed to parse orders after any item with a value, in both
/// directions. Equal and double-miss pairs are `Equal` so the stable sort
/// keeps their original relative order.
fn cmp_optional(a: Option<f64>, b: Option<f64>, descending: bool) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => {
            let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        }
    }
}

/// Stable sort of the saved list by the given key
pub fn apply_sort(mut items: Vec<SavedItem>, key: SortKey) -> Vec<SavedItem> {
    match key {
        SortKey::SavedAtDesc => items.sort_by(|a, b| b.saved_at.cmp(&a.saved_at)),
        SortKey::OpportunityDesc => items.sort_by(|a, b| {
            cmp_optional(
                a.opportunity_score.map(f64::from),
                b.opportunity_score.map(f64::from),
                true,
            )
        }),
        SortKey::RankAsc => items.sort_by(|a, b| {
            cmp_optional(
                parse_rank(&a.rank).map(|n| n as f64),
                parse_rank(&b.rank).map(|n| n as f64),
                false,
            )
        }),
        SortKey::ReviewsAsc => items.sort_by(|a, b| {
            cmp_optional(
                parse_review_count(&a.review_count_text).map(|n| n as f64),
                parse_review_count(&b.review_count_text).map(|n| n as f64),
                false,
            )
        }),
        SortKey::RatingDesc => items.sort_by(|a, b| {
            cmp_optional(parse_rating(&a.rating), parse_rating(&b.rating), true)
        }),
        SortKey::PriceAsc => items.sort_by(|a, b| {
            cmp_optional(money_to_num(&a.price), money_to_num(&b.price), false)
        }),
        SortKey::PriceDesc => items.sort_by(|a, b| {
            cmp_optional(money_to_num(&a.price), money_to_num(&b.price), true)
        }),
    }
    items
}

/// Highlight picks over an already filtered list
#[derive(Debug, Clone)]
pub struct TopPicks<'a> {
    /// Highest opportunity score, first-encountered wins ties
    pub best_opportunity: Option<&'a SavedItem>,
    /// Lowest parsed demand rank; an item without a rank can only win when
    /// no item has one
    pub best_demand: Option<&'a SavedItem>,
}

pub fn top_picks(items: &[SavedItem]) -> TopPicks<'_> {
    // Explicit fold: Iterator::max_by keeps the last maximum, we want the first
    let best_opportunity = items.iter().fold(None::<&SavedItem>, |best, it| {
        let score = |x: &SavedItem| x.opportunity_score.map(i64::from).unwrap_or(-1);
        match best {
            Some(b) if score(b) >= score(it) => Some(b),
            _ => Some(it),
        }
    });

    let best_demand = items
        .iter()
        .min_by_key(|it| parse_rank(&it.rank).unwrap_or(u64::MAX));

    TopPicks {
        best_opportunity,
        best_demand,
    }
}

/// Resolve a compare selection against the saved collection.
///
/// Fails on an empty selection or one past the compare cap. Matches are
/// returned in saved-collection order, not selection order.
pub fn select_for_compare<'a>(
    items: &'a [SavedItem],
    keys: &[String],
    max_count: usize,
) -> Result<Vec<&'a SavedItem>> {
    if keys.is_empty() {
        return Err(ProspectError::EmptySelection);
    }
    if keys.len() > max_count {
        return Err(ProspectError::CompareLimitExceeded {
            selected: keys.len(),
            max: max_count,
        });
    }
    Ok(items
        .iter()
        .filter(|it| keys.iter().any(|k| k == &it.key))
        .collect())
}

/// [`select_for_compare`] with the standard compare cap
pub fn select_for_compare_default<'a>(
    items: &'a [SavedItem],
    keys: &[String],
) -> Result<Vec<&'a SavedItem>> {
    select_for_compare(items, keys, MAX_COMPARE)
}
