//! Preferences, plan and profit commands

use std::str::FromStr;

use colored::Colorize;

use prospect::error::{ProspectError, Result};
use prospect::plan::{PlanState, FREE_SAVED_LIMIT};
use prospect::profit::{estimate, SizeClass};
use prospect::record::{ListPreferences, SortKey};
use prospect::report::profit_text;
use prospect::store::{
    init_defaults, load_plan, load_prefs, load_saved_items, save_plan, save_prefs, SqliteStore,
};

/// Estimate net profit and ROI (Pro)
pub fn cmd_profit(price: f64, cost: f64, size: SizeClass, storage: Option<f64>) -> Result<()> {
    let store = SqliteStore::open()?;
    let plan = load_plan(&store)?;
    if !plan.effective_pro() {
        return Err(ProspectError::ProRequired("profit estimator"));
    }

    let est = estimate(price, cost, size, storage)?;
    println!("{}", profit_text(&est));
    Ok(())
}

/// Show the stored list preferences
pub fn cmd_prefs_show() -> Result<()> {
    let store = SqliteStore::open()?;
    init_defaults(&store)?;
    let prefs = load_prefs(&store)?;

    println!("Sort:            {:?}", prefs.sort);
    println!("Compact:         {}", prefs.compact);
    println!("Min rating:      {}", fmt_threshold(prefs.min_rating));
    println!("Max reviews:     {}", fmt_threshold(prefs.max_reviews));
    println!("Min opportunity: {}", fmt_threshold(prefs.min_opportunity));
    println!("Hide no-price:   {}", prefs.hide_no_price);
    println!("Hide ranges:     {}", prefs.hide_range);
    Ok(())
}

fn fmt_threshold<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "—".to_string())
}

/// Update stored preferences; only the given flags change
#[allow(clippy::too_many_arguments)]
pub fn cmd_prefs_set(
    sort: Option<SortKey>,
    compact: Option<bool>,
    min_rating: Option<String>,
    max_reviews: Option<String>,
    min_opportunity: Option<String>,
    hide_no_price: Option<bool>,
    hide_range: Option<bool>,
) -> Result<()> {
    let store = SqliteStore::open()?;
    init_defaults(&store)?;
    let mut prefs = load_prefs(&store)?;

    if let Some(sort) = sort {
        prefs.sort = sort;
    }
    if let Some(compact) = compact {
        prefs.compact = compact;
    }
    if let Some(value) = parse_threshold::<f64>(min_rating, "min-rating")? {
        prefs.min_rating = value;
    }
    if let Some(value) = parse_threshold::<u64>(max_reviews, "max-reviews")? {
        prefs.max_reviews = value;
    }
    if let Some(value) = parse_threshold::<u8>(min_opportunity, "min-opportunity")? {
        prefs.min_opportunity = value;
    }
    if let Some(flag) = hide_no_price {
        prefs.hide_no_price = flag;
    }
    if let Some(flag) = hide_range {
        prefs.hide_range = flag;
    }

    save_prefs(&store, &prefs)?;
    println!("{}", "✓ Preferences updated".green());
    Ok(())
}

/// Threshold flags accept a number or "none" to clear
fn parse_threshold<T: FromStr>(raw: Option<String>, flag: &str) -> Result<Option<Option<T>>> {
    match raw {
        None => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("none") => Ok(Some(None)),
        Some(s) => match s.parse::<T>() {
            Ok(v) => Ok(Some(Some(v))),
            Err(_) => Err(ProspectError::ConfigError(format!(
                "invalid value for --{flag}: {s} (number or \"none\")"
            ))),
        },
    }
}

/// Reset preferences to the defaults
pub fn cmd_prefs_reset() -> Result<()> {
    let store = SqliteStore::open()?;
    save_prefs(&store, &ListPreferences::default())?;
    println!("{}", "✓ Preferences reset".green());
    Ok(())
}

/// Show plan tier, today's remaining inspections and saved-list usage
pub fn cmd_plan_show() -> Result<()> {
    let store = SqliteStore::open()?;
    init_defaults(&store)?;
    let plan = load_plan(&store)?;
    let saved = load_saved_items(&store)?.len();
    let today = PlanState::today();

    let tier = if plan.is_pro {
        "Pro".green().to_string()
    } else if plan.dev_mode {
        "Free (dev mode, treated as Pro)".yellow().to_string()
    } else {
        "Free".to_string()
    };
    println!("Plan: {tier}");

    match plan.remaining_today(&today) {
        Some(remaining) => println!("Inspections left today: {remaining}"),
        None => println!("Inspections: unmetered"),
    }

    if plan.effective_pro() {
        println!("Saved items: {saved}");
    } else {
        println!("Saved items: {saved}/{FREE_SAVED_LIMIT}");
    }
    Ok(())
}

/// Set entitlement flags
pub fn cmd_plan_set(pro: Option<bool>, dev_mode: Option<bool>) -> Result<()> {
    if pro.is_none() && dev_mode.is_none() {
        return Err(ProspectError::ConfigError(
            "nothing to set; pass --pro and/or --dev-mode".into(),
        ));
    }

    let store = SqliteStore::open()?;
    init_defaults(&store)?;
    let mut plan = load_plan(&store)?;
    if let Some(pro) = pro {
        plan.is_pro = pro;
    }
    if let Some(dev_mode) = dev_mode {
        plan.dev_mode = dev_mode;
    }
    save_plan(&store, &plan)?;

    println!("{}", "✓ Plan updated".green());
    Ok(())
}
