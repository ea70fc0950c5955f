use clap::{Parser, Subcommand};

use crate::profit::SizeClass;
use crate::record::SortKey;

#[derive(Parser)]
#[command(name = "prospect")]
#[command(author, version, about = "Product-listing inspector and sourcing shortlist", long_about = None)]
#[command(after_help = r#"Examples:
  prospect inspect page.html --url https://www.example.com/dp/B0ABC123DE
  prospect inspect page.html --url https://... --save     Score and save in one step
  prospect list --sort opportunity-desc                   Shortlist, best first
  prospect list --min-rating 4.2 --hide-no-price          Filtered view
  prospect compare KEY1 KEY2 KEY3                         Side-by-side (Pro)
  prospect profit --cost 8.50 --price 24.99               Net and ROI (Pro)

Quick Start:
  1. Save a listing page as HTML (browser: Save Page As)
  2. prospect inspect page.html --url <page url> --save
  3. prospect list
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect a saved listing page: resolve price, score, flag complaints
    #[command(after_help = r#"Examples:
  prospect inspect page.html --url https://www.example.com/dp/B0ABC123DE
  prospect inspect page.html --url https://... --save
  prospect inspect page.html --url https://... --json | jq .opportunity.score
"#)]
    Inspect {
        /// Path to the listing page HTML
        #[arg(value_name = "FILE")]
        file: std::path::PathBuf,

        /// URL the page was saved from (carries the catalog id)
        #[arg(long)]
        url: String,

        /// Add the result to the saved list
        #[arg(long)]
        save: bool,

        /// Output the scored record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the saved list
    #[command(after_help = r#"Examples:
  prospect list                             Stored sort and filters
  prospect list --sort rank-asc             Override sort for this run
  prospect list --min-rating 4.2 --max-reviews 500
  prospect list --json | jq '.[].key'       Keys for compare/remove
"#)]
    List {
        /// Sort order (overrides the stored preference for this run)
        #[arg(long, value_enum)]
        sort: Option<SortKey>,

        /// One line per item
        #[arg(long)]
        compact: bool,

        /// Drop items rated below this
        #[arg(long)]
        min_rating: Option<f64>,

        /// Drop items with more reviews than this
        #[arg(long)]
        max_reviews: Option<u64>,

        /// Drop items whose opportunity score is below this
        #[arg(long)]
        min_opportunity: Option<u8>,

        /// Drop items with no resolved price
        #[arg(long)]
        hide_no_price: bool,

        /// Drop range-priced items
        #[arg(long)]
        hide_range: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare saved items side by side (Pro)
    Compare {
        /// Saved-item keys, up to 5
        #[arg(value_name = "KEY", required = true)]
        keys: Vec<String>,
    },

    /// Remove one item from the saved list
    Remove {
        /// Saved-item key
        #[arg(value_name = "KEY")]
        key: String,
    },

    /// Remove every saved item
    Clear {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Estimate net profit and ROI for a sourcing candidate (Pro)
    #[command(after_help = r#"Examples:
  prospect profit --cost 8.50 --price 24.99
  prospect profit --cost 8.50 --price 24.99 --size small --storage 0.50
"#)]
    Profit {
        /// Expected sale price
        #[arg(long)]
        price: f64,

        /// Unit sourcing cost
        #[arg(long)]
        cost: f64,

        /// Fulfillment size class
        #[arg(long, value_enum, default_value = "standard")]
        size: SizeClass,

        /// Monthly storage fee per unit (default 0.78)
        #[arg(long)]
        storage: Option<f64>,
    },

    /// Saved-list preferences
    #[command(subcommand, after_help = r#"Examples:
  prospect prefs show
  prospect prefs set --sort opportunity-desc --hide-no-price true
  prospect prefs reset
"#)]
    Prefs(PrefsCommands),

    /// Plan status and entitlement flags
    #[command(subcommand, after_help = r#"Examples:
  prospect plan show
  prospect plan set --pro true
"#)]
    Plan(PlanCommands),
}

#[derive(Subcommand)]
pub enum PrefsCommands {
    /// Show the stored preferences
    Show,

    /// Update stored preferences (only the given flags change)
    #[command(after_help = r#"Examples:
  prospect prefs set --sort opportunity-desc
  prospect prefs set --hide-no-price true --min-rating 4.0
  prospect prefs set --min-rating none      Clear a threshold
"#)]
    Set {
        /// Default sort order
        #[arg(long, value_enum)]
        sort: Option<SortKey>,

        /// Compact list rendering
        #[arg(long)]
        compact: Option<bool>,

        /// Minimum rating threshold, or "none" to clear
        #[arg(long)]
        min_rating: Option<String>,

        /// Maximum review-count threshold, or "none" to clear
        #[arg(long)]
        max_reviews: Option<String>,

        /// Minimum opportunity-score threshold, or "none" to clear
        #[arg(long)]
        min_opportunity: Option<String>,

        /// Hide items with no resolved price
        #[arg(long)]
        hide_no_price: Option<bool>,

        /// Hide range-priced items
        #[arg(long)]
        hide_range: Option<bool>,
    },

    /// Reset preferences to the defaults
    Reset,
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Show plan tier and today's remaining inspections
    Show,

    /// Set entitlement flags
    Set {
        /// Pro entitlement
        #[arg(long)]
        pro: Option<bool>,

        /// Developer override, counts as pro
        #[arg(long)]
        dev_mode: Option<bool>,
    },
}
