//! Core commands (classify, color, periods) and shared config loading

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tint_core::{BudgetPeriod, BudgetStatus, ColorScale, HealthConfig, StatusClassifier};

use super::print_json;

/// Load the embedded config, layered with `path` or the user config file
pub fn load_config(path: Option<&Path>) -> Result<HealthConfig> {
    HealthConfig::load(path).context("Failed to load configuration")
}

pub fn cmd_classify(config: &HealthConfig, spent: f64, budgeted: f64, json: bool) -> Result<()> {
    print_status(&classify_amounts(config, spent, budgeted), json)
}

/// Status for one spent/budgeted pair under the configured thresholds
pub fn classify_amounts(config: &HealthConfig, spent: f64, budgeted: f64) -> BudgetStatus {
    StatusClassifier::new(config.status_thresholds).classify(spent, budgeted)
}

pub fn cmd_color(percentage: f64) -> Result<()> {
    println!("{}", gradient_color(percentage));
    Ok(())
}

/// Gradient color for a percentage as `#RRGGBB`
pub fn gradient_color(percentage: f64) -> String {
    ColorScale::budget().color_at(percentage).to_hex()
}

pub fn cmd_periods(config: &HealthConfig, file: &Path, json: bool) -> Result<()> {
    print_status(&aggregate_file(config, file)?, json)
}

/// Aggregate status of the periods stored in `file`
pub fn aggregate_file(config: &HealthConfig, file: &Path) -> Result<BudgetStatus> {
    let periods = load_periods(file)?;
    Ok(StatusClassifier::new(config.status_thresholds).aggregate(&periods))
}

/// Read a JSON array of budget periods
pub fn load_periods(path: &Path) -> Result<Vec<BudgetPeriod>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid budget periods in {}", path.display()))
}

pub(crate) fn print_status(status: &BudgetStatus, json: bool) -> Result<()> {
    if json {
        return print_json(status);
    }

    println!();
    println!("{} {}", status.icon, status.status.as_str());
    println!("   Spent:  {:.1}% of budget", status.percentage);
    println!("   Color:  {}", status.color);
    println!("   {}", status.description);
    println!();
    Ok(())
}
