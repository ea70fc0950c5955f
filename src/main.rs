//! prospect - product-listing inspector and sourcing shortlist CLI

use clap::Parser;

use prospect::cli::{Cli, Commands, PlanCommands, PrefsCommands};
use prospect::error::Result;

mod commands;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        if let Some(hint) = e.hint() {
            eprintln!("\n{}", hint);
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect {
            file,
            url,
            save,
            json,
        } => commands::cmd_inspect(&file, &url, save, json),

        Commands::List {
            sort,
            compact,
            min_rating,
            max_reviews,
            min_opportunity,
            hide_no_price,
            hide_range,
            json,
        } => commands::cmd_list(
            sort, compact, min_rating, max_reviews, min_opportunity,
            hide_no_price, hide_range, json,
        ),

        Commands::Compare { keys } => commands::cmd_compare(keys),
        Commands::Remove { key } => commands::cmd_remove(&key),
        Commands::Clear { yes } => commands::cmd_clear(yes),

        Commands::Profit {
            price,
            cost,
            size,
            storage,
        } => commands::cmd_profit(price, cost, size, storage),

        Commands::Prefs(PrefsCommands::Show) => commands::cmd_prefs_show(),
        Commands::Prefs(PrefsCommands::Set {
            sort,
            compact,
            min_rating,
            max_reviews,
            min_opportunity,
            hide_no_price,
            hide_range,
        }) => commands::cmd_prefs_set(
            sort, compact, min_rating, max_reviews, min_opportunity,
            hide_no_price, hide_range,
        ),
        Commands::Prefs(PrefsCommands::Reset) => commands::cmd_prefs_reset(),

        Commands::Plan(PlanCommands::Show) => commands::cmd_plan_show(),
        Commands::Plan(PlanCommands::Set { pro, dev_mode }) => {
            commands::cmd_plan_set(pro, dev_mode)
        }
    }
}
