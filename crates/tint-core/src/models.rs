//! Domain models for Tint
//!
//! These are read-only snapshots supplied by an upstream data layer. JSON
//! field names are camelCase to match the feed (`budgetId`, `spentAmount`).

use std::io::Read;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;
use crate::status::spend_percentage;

/// A category's allotment for the current month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub category_id: String,
    #[serde(default)]
    pub name: String,
    pub amount: f64,
}

impl Budget {
    pub fn new(id: impl Into<String>, category_id: impl Into<String>, amount: f64) -> Self {
        Self {
            id: id.into(),
            category_id: category_id.into(),
            name: String::new(),
            amount,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Spend against one category budget over a date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetPeriod {
    pub id: String,
    pub budget_id: String,
    pub category_id: String,
    /// Non-negative by convention; not enforced
    pub budgeted_amount: f64,
    pub spent_amount: f64,
    pub remaining_amount: f64,
    /// +inf for spend against a zero budget, `null` in JSON
    #[serde(with = "crate::status::percentage_serde")]
    pub percentage: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_over_budget: bool,
}

impl BudgetPeriod {
    /// Build a period, deriving remaining amount, percentage and the
    /// over-budget flag from the two amounts
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        budget_id: impl Into<String>,
        category_id: impl Into<String>,
        budgeted_amount: f64,
        spent_amount: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        let percentage = spend_percentage(spent_amount, budgeted_amount);
        Self {
            id: id.into(),
            budget_id: budget_id.into(),
            category_id: category_id.into(),
            budgeted_amount,
            spent_amount,
            remaining_amount: budgeted_amount - spent_amount,
            percentage,
            start_date,
            end_date,
            is_over_budget: percentage >= 100.0,
        }
    }
}

/// A bank transaction. Negative amounts are debits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(deserialize_with = "deserialize_date")]
    pub date: NaiveDate,
    pub amount: f64,
    #[serde(default, alias = "category_id")]
    pub category_id: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl Transaction {
    pub fn new(id: impl Into<String>, date: NaiveDate, amount: f64) -> Self {
        Self {
            id: id.into(),
            date,
            amount,
            category_id: None,
            description: String::new(),
        }
    }

    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether this is an expense (money out)
    pub fn is_debit(&self) -> bool {
        self.amount < 0.0
    }

    /// Read transactions from CSV with headers
    /// `id,date,amount,category_id,description`
    pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Transaction>> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut transactions = Vec::new();
        for record in rdr.deserialize() {
            let tx: Transaction = record?;
            transactions.push(tx);
        }
        Ok(transactions)
    }
}

/// Parse an ISO date (`2024-01-15`) or an RFC 3339 timestamp
/// (`2024-01-15T10:30:00Z`), keeping the calendar date
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

fn deserialize_date<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<NaiveDate, D::Error> {
    let s = String::deserialize(deserializer)?;
    parse_date(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", s)))
}
