//! Inspect command: extract, resolve, score and optionally save

use std::path::Path;

use colored::Colorize;

use prospect::collection::{upsert, UpsertOutcome};
use prospect::complaints::analyze_complaints;
use prospect::error::{ProspectError, Result};
use prospect::listing::ListingFacts;
use prospect::normalize::parse_review_count;
use prospect::plan::PlanState;
use prospect::record::{SavedItem, ScoredRecord};
use prospect::resolve::resolve_price_traced;
use prospect::score::{content_score, opportunity_score, OpportunitySignals};
use prospect::store::{
    init_defaults, load_plan, load_saved_items, save_plan, save_saved_items, SqliteStore,
};

/// Inspect a saved listing page
pub fn cmd_inspect(file: &Path, url: &str, save: bool, json: bool) -> Result<()> {
    let store = SqliteStore::open()?;
    init_defaults(&store)?;

    // Meter before doing any work; the rejected attempt leaves state untouched
    let mut plan = load_plan(&store)?;
    let today = PlanState::today();
    plan.register_inspection(&today)?;
    save_plan(&store, &plan)?;

    let html = std::fs::read_to_string(file)?;
    let facts = ListingFacts::from_html(url, &html);
    if facts.title.is_empty() {
        return Err(ProspectError::ExtractionError(
            "no product title on the page".into(),
        ));
    }

    let (price, price_source) = {
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

    let scored = ScoredRecord {
        record: facts.into_record(price),
        opportunity,
        content,
        complaints,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&scored)?);
    } else {
        print_scored(&scored, price_source, &plan, &today);
    }

    if save {
        let mut items = load_saved_items(&store)?;
        let outcome = upsert(&mut items, SavedItem::from_scored(&scored), &plan)?;
        save_saved_items(&store, &items)?;
        match outcome {
            UpsertOutcome::Saved => println!("\n{}", "✓ Saved to list".green()),
            UpsertOutcome::Updated => println!("\n{}", "✓ Updated existing entry".green()),
        }
    }

    Ok(())
}

fn print_scored(scored: &ScoredRecord, price_source: Option<&str>, plan: &PlanState, today: &str) {
    let r = &scored.record;

    println!("\n{}", r.title.bold());
    if !r.asin.is_empty() {
        println!("  ASIN:     {}", r.asin);
    }
    if !r.selected_variant.is_empty() {
        println!("  Variant:  {}", r.selected_variant);
    }
    if !r.category.is_empty() {
        println!("  Category: {}", r.category);
    }

    let range_note = if r.price.is_range { " (range)" } else { "" };
    if r.price.is_missing() {
        println!("  Price:    {}", r.price.display.yellow());
    } else {
        println!("  Price:    {}{}", r.price.display.green(), range_note);
        if let Some(source) = price_source {
            println!("            {}", format!("via {source}").dimmed());
        }
    }

    if !r.rating.is_empty() {
        println!("  Rating:   {}", r.rating);
    }
    if !r.review_count_text.is_empty() {
        println!("  Reviews:  {}", r.review_count_text);
    }
    if !r.rank.is_empty() {
        println!("  Rank:     {}", r.rank);
    }
    if !r.ships_from.is_empty() || !r.sold_by.is_empty() {
        println!("  Merchant: ships from {} / sold by {}", r.ships_from, r.sold_by);
    }

    println!();
    println!(
        "  Opportunity: {}",
        format!("{}/100", scored.opportunity.score).bold()
    );
    for note in &scored.opportunity.notes {
        println!("    {}", note.dimmed());
    }
    println!(
        "  Content:     {}",
        format!("{}/100", scored.content.score).bold()
    );
    for note in &scored.content.notes {
        println!("    {}", note.dimmed());
    }

    if !scored.complaints.is_empty() {
        println!("\n  {}", "Common complaints:".yellow());
        for hit in &scored.complaints {
            println!("    {} ({} mentions)", hit.label, hit.count);
        }
    }

    if let Some(remaining) = plan.remaining_today(today) {
        println!("\n{}", format!("{remaining} inspections left today").dimmed());
    }
}
