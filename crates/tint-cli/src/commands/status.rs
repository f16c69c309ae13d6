//! Status command: the full reactive pipeline over input files

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tint_core::{
    Budget, BudgetFeed, Clock, HealthConfig, HealthSnapshot, ReactiveController, SystemClock,
    Transaction,
};

use super::{print_json, print_status};

pub fn cmd_status(
    config: &HealthConfig,
    budgets_path: &Path,
    transactions_path: &Path,
    json: bool,
) -> Result<()> {
    let budgets = load_budgets(budgets_path)?;
    let transactions = load_transactions(transactions_path)?;
    let snapshot = status_snapshot(config, Arc::new(SystemClock), budgets, transactions);

    if json {
        return print_json(&snapshot);
    }

    print_status(&snapshot.status, false)?;
    println!("   Icon:   {}", snapshot.icon_variant.config().file_name);
    println!(
        "   Theme:  primary {}  light {}  dark {}",
        snapshot.theme.primary, snapshot.theme.primary_light, snapshot.theme.primary_dark
    );

    if !snapshot.periods.is_empty() {
        println!();
        println!("   {:<20} {:>10} {:>10} {:>8}", "Category", "Spent", "Budget", "Used");
        for period in &snapshot.periods {
            println!(
                "   {:<20} {:>10.2} {:>10.2} {:>7.1}%{}",
                period.category_id,
                period.spent_amount,
                period.budgeted_amount,
                period.percentage,
                if period.is_over_budget { " !" } else { "" }
            );
        }
    }
    println!();
    Ok(())
}

/// Push the inputs through a feed-attached controller and return what it
/// published
pub fn status_snapshot(
    config: &HealthConfig,
    clock: Arc<dyn Clock>,
    budgets: Vec<Budget>,
    transactions: Vec<Transaction>,
) -> HealthSnapshot {
    let feed = BudgetFeed::new();
    let controller = ReactiveController::with_clock(config, clock);
    controller.attach(&feed);
    feed.replace(budgets, transactions);
    controller.snapshot()
}

/// Read a JSON array of budgets
pub fn load_budgets(path: &Path) -> Result<Vec<Budget>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid budgets in {}", path.display()))
}

/// Read transactions from CSV (`.csv` extension) or a JSON array
pub fn load_transactions(path: &Path) -> Result<Vec<Transaction>> {
    let is_csv = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    if is_csv {
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let transactions = Transaction::read_csv(file)
            .with_context(|| format!("Invalid transaction CSV in {}", path.display()))?;
        tracing::debug!(count = transactions.len(), path = %path.display(), "Loaded CSV transactions");
        return Ok(transactions);
    }

    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid transactions in {}", path.display()))
}
