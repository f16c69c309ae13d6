//! Tint CLI - Budget health classification and theming
//!
//! Usage:
//!   tint classify --spent 420 --budgeted 500     Classify one budget
//!   tint color --percentage 82.5                 Gradient color for a percentage
//!   tint status --budgets b.json --transactions tx.csv
//!   tint icon sync --percentage 91               Update the persisted app icon

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Classify {
            spent,
            budgeted,
            json,
        } => commands::cmd_classify(&config, spent, budgeted, json),
        Commands::Color { percentage } => commands::cmd_color(percentage),
        Commands::Periods { file, json } => commands::cmd_periods(&config, &file, json),
        Commands::Status {
            budgets,
            transactions,
            json,
        } => commands::cmd_status(&config, &budgets, &transactions, json),
        Commands::Icon { store, action } => {
            let icons = commands::open_icon_store(store.as_deref(), &config);
            match action {
                IconAction::Current => commands::cmd_icon_current(&icons).await,
                IconAction::Describe => commands::cmd_icon_describe(&icons).await,
                IconAction::History => commands::cmd_icon_history(&icons).await,
                IconAction::Reset => commands::cmd_icon_reset(&icons).await,
                IconAction::Init { percentage } => {
                    commands::cmd_icon_init(&icons, percentage).await
                }
                IconAction::Sync { percentage, reason } => {
                    commands::cmd_icon_sync(&icons, percentage, &reason).await
                }
                IconAction::Set { color, status } => {
                    commands::cmd_icon_set(&icons, &color, &status).await
                }
                IconAction::ClearHistory => commands::cmd_icon_clear_history(&icons).await,
                IconAction::Supported => commands::cmd_icon_supported(&icons),
            }
        }
    }
}
