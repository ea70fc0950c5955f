//! Saved-list commands: list, compare, remove, clear

use colored::Colorize;

use prospect::collection::{
    apply_filters, apply_sort, clear, remove, select_for_compare_default, top_picks,
};
use prospect::error::{ProspectError, Result};
use prospect::record::SortKey;
use prospect::report::{compare_text, saved_item_line, top_picks_lines};
use prospect::store::{
    init_defaults, load_plan, load_prefs, load_saved_items, save_saved_items, SqliteStore,
};

/// Show the saved list with the stored preferences, optionally overridden
/// for this run
#[allow(clippy::too_many_arguments)]
pub fn cmd_list(
    sort: Option<SortKey>,
    compact: bool,
    min_rating: Option<f64>,
    max_reviews: Option<u64>,
    min_opportunity: Option<u8>,
    hide_no_price: bool,
    hide_range: bool,
    json: bool,
) -> Result<()> {
    let store = SqliteStore::open()?;
    init_defaults(&store)?;

    let items = load_saved_items(&store)?;
    let mut prefs = load_prefs(&store)?;

    // CLI flags override the stored preferences for this run only
    if let Some(sort) = sort {
        prefs.sort = sort;
    }
    if min_rating.is_some() {
        prefs.min_rating = min_rating;
    }
    if max_reviews.is_some() {
        prefs.max_reviews = max_reviews;
    }
    if min_opportunity.is_some() {
        prefs.min_opportunity = min_opportunity;
    }
    prefs.hide_no_price |= hide_no_price;
    prefs.hide_range |= hide_range;
    prefs.compact |= compact;

    let total = items.len();
    let visible = apply_sort(apply_filters(&items, &prefs), prefs.sort);

    if json {
        println!("{}", serde_json::to_string_pretty(&visible)?);
        return Ok(());
    }

    if total == 0 {
        println!("No saved items yet. Inspect a listing with --save to add one.");
        return Ok(());
    }
    if visible.is_empty() {
        println!("No items match the active filters ({total} saved).");
        return Ok(());
    }

    for item in &visible {
        println!("{}", saved_item_line(item, prefs.compact));
        if !prefs.compact {
            println!("  {}", item.key.dimmed());
        }
    }

    println!("\nShowing {} of {} saved", visible.len(), total);
    for line in top_picks_lines(&top_picks(&visible)) {
        println!("{}", line.cyan());
    }

    Ok(())
}

/// Side-by-side compare of saved items (Pro)
pub fn cmd_compare(keys: Vec<String>) -> Result<()> {
    let store = SqliteStore::open()?;
    let plan = load_plan(&store)?;
    if !plan.effective_pro() {
        return Err(ProspectError::ProRequired("compare"));
    }

    let items = load_saved_items(&store)?;
    let selected = select_for_compare_default(&items, &keys)?;
    if selected.is_empty() {
        return Err(ProspectError::ItemNotFound(keys.join(", ")));
    }

    println!("{}", compare_text(&selected));
    Ok(())
}

/// Remove one item by key
pub fn cmd_remove(key: &str) -> Result<()> {
    let store = SqliteStore::open()?;
    let mut items = load_saved_items(&store)?;
    if !remove(&mut items, key) {
        return Err(ProspectError::ItemNotFound(key.to_string()));
    }
    save_saved_items(&store, &items)?;
    println!("{}", "✓ Removed".green());
    Ok(())
}

/// Remove every saved item
pub fn cmd_clear(yes: bool) -> Result<()> {
    let store = SqliteStore::open()?;
    let mut items = load_saved_items(&store)?;
    if items.is_empty() {
        println!("Nothing to clear.");
        return Ok(());
    }
    if !yes {
        return Err(ProspectError::ConfigError(format!(
            "this would remove {} saved items; pass --yes to confirm",
            items.len()
        )));
    }
    let count = items.len();
    clear(&mut items);
    save_saved_items(&store, &items)?;
    println!("{}", format!("✓ Cleared {count} items").green());
    Ok(())
}
