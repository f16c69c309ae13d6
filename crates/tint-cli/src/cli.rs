//! CLI argument definitions using clap
//!
//! Command implementations live in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tint - Budget health as color
#[derive(Parser)]
#[command(name = "tint")]
#[command(about = "Classify budget health and drive theme colors and app icons", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file overriding the built-in thresholds
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify a single spent/budgeted pair
    Classify {
        /// Amount spent
        #[arg(long, allow_negative_numbers = true)]
        spent: f64,

        /// Amount budgeted
        #[arg(long, allow_negative_numbers = true)]
        budgeted: f64,

        /// Print the status as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the gradient color for a percentage
    Color {
        /// Percentage of budget used
        #[arg(short, long, allow_negative_numbers = true)]
        percentage: f64,
    },

    /// Aggregate budget periods from a JSON file
    Periods {
        /// JSON array of budget periods
        #[arg(short, long)]
        file: PathBuf,

        /// Print the status as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the full pipeline over budgets and this month's transactions
    Status {
        /// JSON array of budgets
        #[arg(short, long)]
        budgets: PathBuf,

        /// Transactions as JSON or CSV (by extension)
        #[arg(short, long)]
        transactions: PathBuf,

        /// Print the full snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect or change the persisted app icon state
    Icon {
        /// Icon state file (defaults to the user data directory)
        #[arg(long)]
        store: Option<PathBuf>,

        #[command(subcommand)]
        action: IconAction,
    },
}

#[derive(Subcommand)]
pub enum IconAction {
    /// Show the current icon variant
    Current,

    /// Describe the current icon
    Describe,

    /// Show recorded icon changes
    History,

    /// Reset the icon to the default variant
    Reset,

    /// Set the icon for a percentage without recording history
    Init {
        #[arg(short, long, allow_negative_numbers = true)]
        percentage: f64,
    },

    /// Switch the icon if the percentage maps to a new variant
    Sync {
        #[arg(short, long, allow_negative_numbers = true)]
        percentage: f64,

        /// Reason recorded in the history
        #[arg(short, long, default_value = "manual sync")]
        reason: String,
    },

    /// Set the icon from a status color and label
    Set {
        /// Status color, e.g. #F97316
        #[arg(long)]
        color: String,

        /// Status label, e.g. warning
        #[arg(long)]
        status: String,
    },

    /// Delete the icon change history
    ClearHistory,

    /// Report whether this platform supports alternate icons
    Supported,
}
