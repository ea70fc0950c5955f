//! End-to-end flow over the library API: inspect a page fixture, score it,
//! save it under quota rules, then filter, sort and compare the list.

use prospect::collection::{
    apply_filters, apply_sort, select_for_compare_default, top_picks, upsert, UpsertOutcome,
};
use prospect::complaints::analyze_complaints;
use prospect::listing::ListingFacts;
use prospect::normalize::parse_review_count;
use prospect::plan::{PlanState, FREE_SAVED_LIMIT, MAX_COMPARE};
use prospect::record::{ListPreferences, SavedItem, ScoredRecord, SortKey};
use prospect::resolve::resolve_price_traced;
use prospect::score::{content_score, opportunity_score, OpportunitySignals};
use prospect::store::{init_defaults, load_saved_items, save_saved_items, MemoryStore};
use prospect::ProspectError;

const FIXTURE_URL: &str = "https://www.example.com/dp/B0FLOWTEST1";

fn fixture_html() -> String {
    r#"
    <html><body>
        <span id="productTitle">Collapsible Silicone Travel Water Bottle with Carabiner, Leakproof, BPA Free, 20oz</span>
        <a id="bylineInfo">Visit the TrailGear Store</a>
        <div id="variation_color_name"><span class="selection">Forest Green</span></div>
        <div id="corePriceDisplay_desktop_feature_div">
            <span class="priceToPay"><span class="a-offscreen">$18.95</span></span>
        </div>
        <span id="acrPopover"><span class="a-icon-alt">4.3 out of 5 stars</span></span>
        <span id="acrCustomerReviewText">412 ratings</span>
        <div id="wayfinding-breadcrumbs_container"><ul class="a-unordered-list">
            <li><a>Sports &amp; Outdoors</a></li><li><a>Water Bottles</a></li>
        </ul></div>
        <div id="feature-bullets"><ul>
            <li><span class="a-list-item">Folds to half its size for packing</span></li>
            <li><span class="a-list-item">Food-grade silicone, BPA free</span></li>
            <li><span class="a-list-item">Leakproof twist cap with carabiner</span></li>
            <li><span class="a-list-item">Dishwasher safe, 20 oz capacity</span></li>
            <li><span class="a-list-item">Backed by a two year warranty</span></li>
        </ul></div>
        <table><tr><th>Best Sellers Rank</th><td>#4,102 in Sports &amp; Outdoors</td></tr></table>
        <div data-hook="review"><span data-hook="review-body">The cap broke after two weeks, cheap plastic threads</span></div>
        <div data-hook="review"><span data-hook="review-body">Smaller than expected, runs small for a 20oz bottle</span></div>
        <div data-hook="review"><span data-hook="review-body">Great for hiking, packs down tiny</span></div>
    </body></html>
    "#
    .to_string()
}

fn score_fixture() -> ScoredRecord {
    let facts = ListingFacts::from_html(FIXTURE_URL, &fixture_html());
    let (price, _) = {
        let probes = facts.price_probes();
        resolve_price_traced(&probes)
    };
    let opportunity = opportunity_score(&OpportunitySignals {
        rating: &facts.rating,
        review_count: parse_review_count(&facts.review_count_text),
        rank: &facts.rank,
    });
    let content = content_score(&facts.title, &facts.bullets, &facts.brand);
    let complaints = analyze_complaints(&facts.reviews);
    ScoredRecord {
        record: facts.into_record(price),
        opportunity,
        content,
        complaints,
    }
}

#[test]
fn test_inspect_pipeline_produces_scored_record() {
    let scored = score_fixture();
    let r = &scored.record;

    assert_eq!(r.asin, "B0FLOWTEST1");
    assert_eq!(r.brand, "TrailGear");
    assert_eq!(r.selected_variant, "Color: Forest Green");
    assert_eq!(r.price.numeric, Some(18.95));
    assert!(!r.price.is_range);
    assert_eq!(r.category, "Sports & Outdoors > Water Bottles");
    assert_eq!(r.bullets.len(), 5);

    // Long keyworded title, brand, 5 bullets and attribute mentions score high
    assert!(scored.content.score >= 70, "content {}", scored.content.score);
    // 4.3 rating, 412 reviews, rank ~4k: solid but not peak opportunity
    assert!(scored.opportunity.score >= 60, "opportunity {}", scored.opportunity.score);

    // Quality and size complaints are both present in the reviews
    let labels: Vec<&str> = scored.complaints.iter().map(|h| h.label.as_str()).collect();
    assert!(labels.contains(&"Quality / breaks"));
    assert!(labels.len() <= 2);
}

#[test]
fn test_save_list_flow_round_trips_through_store() {
    let store = MemoryStore::new();
    init_defaults(&store).unwrap();
    let plan = PlanState::default();

    let scored = score_fixture();
    let mut items = load_saved_items(&store).unwrap();
    assert!(items.is_empty());

    let outcome = upsert(&mut items, SavedItem::from_scored(&scored), &plan).unwrap();
    assert_eq!(outcome, UpsertOutcome::Saved);
    save_saved_items(&store, &items).unwrap();

    // Re-inspecting the same variant replaces, not duplicates
    let mut items = load_saved_items(&store).unwrap();
    let outcome = upsert(&mut items, SavedItem::from_scored(&scored), &plan).unwrap();
    assert_eq!(outcome, UpsertOutcome::Updated);
    save_saved_items(&store, &items).unwrap();
    assert_eq!(load_saved_items(&store).unwrap().len(), 1);
}

fn synthetic_item(n: usize) -> SavedItem {
    let scored = score_fixture();
    let mut item = SavedItem::from_scored(&scored);
    item.key = format!("B0SYNTH{n:04}::::{}", item.url);
    item.title = format!("Synthetic item {n}");
    item.saved_at = n as i64;
    item
}

#[test]
fn test_quota_then_pro_upgrade() {
    let plan = PlanState::default();
    let mut items = Vec::new();
    for n in 0..FREE_SAVED_LIMIT {
        upsert(&mut items, synthetic_item(n), &plan).unwrap();
    }

    let err = upsert(&mut items, synthetic_item(99), &plan).unwrap_err();
    assert!(matches!(err, ProspectError::QuotaExceeded { .. }));
    assert_eq!(items.len(), FREE_SAVED_LIMIT);

    let pro = PlanState {
        is_pro: true,
        ..Default::default()
    };
    upsert(&mut items, synthetic_item(99), &pro).unwrap();
    assert_eq!(items.len(), FREE_SAVED_LIMIT + 1);
}

#[test]
fn test_filter_sort_and_top_picks() {
    let mut items: Vec<SavedItem> = (0..6).map(synthetic_item).collect();
    items[0].price = "Price not found".to_string();
    items[1].price_is_range = true;
    items[2].opportunity_score = Some(90);
    items[3].opportunity_score = Some(90);
    items[4].rank = "#12 in Sports & Outdoors".to_string();
    items[5].rating = "3.1 out of 5 stars".to_string();

    let prefs = ListPreferences {
        hide_no_price: true,
        hide_range: true,
        min_rating: Some(4.0),
        ..Default::default()
    };
    let visible = apply_filters(&items, &prefs);
    // Items 0, 1 and 5 are filtered out
    assert_eq!(visible.len(), 3);

    let sorted = apply_sort(visible, SortKey::OpportunityDesc);
    assert_eq!(sorted[0].opportunity_score, Some(90));
    // Tied scores keep collection order; item 2 was saved before item 3
    assert_eq!(sorted[0].title, "Synthetic item 2");
    assert_eq!(sorted[1].title, "Synthetic item 3");

    let picks = top_picks(&sorted);
    assert_eq!(picks.best_opportunity.unwrap().title, "Synthetic item 2");
    assert_eq!(picks.best_demand.unwrap().title, "Synthetic item 4");
}

#[test]
fn test_compare_selection_rules() {
    let items: Vec<SavedItem> = (0..8).map(synthetic_item).collect();

    let keys: Vec<String> = vec![items[4].key.clone(), items[1].key.clone()];
    let selected = select_for_compare_default(&items, &keys).unwrap();
    // Collection order, not selection order
    assert_eq!(selected[0].title, "Synthetic item 1");
    assert_eq!(selected[1].title, "Synthetic item 4");

    let too_many: Vec<String> = items.iter().take(MAX_COMPARE + 1).map(|i| i.key.clone()).collect();
    assert!(matches!(
        select_for_compare_default(&items, &too_many).unwrap_err(),
        ProspectError::CompareLimitExceeded { .. }
    ));

    // Unknown keys resolve to an empty selection rather than an error
    let unknown = vec!["missing-key".to_string()];
    assert!(select_for_compare_default(&items, &unknown).unwrap().is_empty());
}

#[test]
fn test_daily_meter_resets_and_blocks() {
    let mut plan = PlanState::default();
    for _ in 0..prospect::plan::FREE_DAILY_LIMIT {
        plan.register_inspection("2026-08-29").unwrap();
    }
    assert!(plan.register_inspection("2026-08-29").is_err());

    // A new day resets the meter
    plan.register_inspection("2026-08-30").unwrap();
    assert_eq!(plan.remaining_today("2026-08-30"), Some(prospect::plan::FREE_DAILY_LIMIT - 1));
}
