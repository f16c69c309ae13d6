//! Status classification: (spent, budgeted) -> discrete health status
//!
//! Classification is pure. The same inputs always produce the same
//! [`BudgetStatus`], and a classifier can be shared freely across callers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::config::ThresholdTable;

/// Qualitative financial health, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Excellent,
    Good,
    Warning,
    Danger,
    OverBudget,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::OverBudget => "over_budget",
        }
    }

    /// All statuses in severity order
    pub fn all() -> &'static [HealthStatus] {
        &[
            Self::Excellent,
            Self::Good,
            Self::Warning,
            Self::Danger,
            Self::OverBudget,
        ]
    }

    /// Status for a bucket index produced by [`ThresholdTable::bucket`]
    pub fn from_bucket(bucket: usize) -> Self {
        match bucket {
            0 => Self::Excellent,
            1 => Self::Good,
            2 => Self::Warning,
            3 => Self::Danger,
            _ => Self::OverBudget,
        }
    }

    /// Badge color as RGB channels
    pub fn rgb(&self) -> Rgb {
        match self {
            Self::Excellent => Rgb::new(0x22, 0xC5, 0x5E),
            Self::Good => Rgb::new(0x84, 0xCC, 0x16),
            Self::Warning => Rgb::new(0xF9, 0x73, 0x16),
            Self::Danger => Rgb::new(0xEF, 0x28, 0x14),
            Self::OverBudget => Rgb::new(0xE0, 0x00, 0x1B),
        }
    }

    /// Badge color as `#RRGGBB`
    pub fn color(&self) -> String {
        self.rgb().to_hex()
    }

    /// Glyph name for status badges
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Excellent => "checkmark-circle",
            Self::Good => "thumbs-up",
            Self::Warning => "alert-circle",
            Self::Danger => "warning",
            Self::OverBudget => "close-circle",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent! You're well under budget.",
            Self::Good => "Good job! You're on track with your budget.",
            Self::Warning => "Careful! You're approaching your budget limit.",
            Self::Danger => "Alert! You've reached your budget limit.",
            Self::OverBudget => "Over budget! Time to review your spending.",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HealthStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "excellent" => Ok(Self::Excellent),
            "good" => Ok(Self::Good),
            "warning" => Ok(Self::Warning),
            "danger" => Ok(Self::Danger),
            "over_budget" | "over-budget" | "overbudget" => Ok(Self::OverBudget),
            _ => Err(format!("Unknown health status: {}", s)),
        }
    }
}

/// Badge color for a status label, falling back to "good" for unknown labels
pub fn status_color(label: &str) -> String {
    label
        .parse::<HealthStatus>()
        .unwrap_or(HealthStatus::Good)
        .color()
}

/// Description for a status label, falling back to "good" for unknown labels
pub fn status_description(label: &str) -> &'static str {
    label
        .parse::<HealthStatus>()
        .unwrap_or(HealthStatus::Good)
        .description()
}

/// Result of classifying spend against a budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    /// Percent of budget spent. Negative for net refunds, +inf when money was
    /// spent against a zero budget.
    #[serde(with = "percentage_serde")]
    pub percentage: f64,
    pub status: HealthStatus,
    pub color: String,
    pub icon: String,
    pub description: String,
}

impl BudgetStatus {
    /// Status record for `status` at `percentage` with the stock color,
    /// icon and description
    pub fn new(status: HealthStatus, percentage: f64) -> Self {
        Self {
            percentage,
            status,
            color: status.color(),
            icon: status.icon().to_string(),
            description: status.description().to_string(),
        }
    }
}

/// Percent of `budgeted` that `spent` represents
///
/// A zero budget yields +inf when anything was spent and 0 otherwise.
/// Negative spend is not clamped.
pub fn spend_percentage(spent: f64, budgeted: f64) -> f64 {
    if budgeted == 0.0 {
        if spent > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    } else {
        spent / budgeted * 100.0
    }
}

/// Serde for spend percentages
///
/// JSON has no infinity. Non-finite values are written as `null` and `null`
/// reads back as +inf (the zero-budget case).
pub mod percentage_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

/// Maps spend percentages onto [`HealthStatus`] using a threshold table
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StatusClassifier {
    thresholds: ThresholdTable,
}

impl StatusClassifier {
    /// Create a classifier with custom bounds
    ///
    /// The table should be validated first; see [`ThresholdTable::validate`].
    pub fn new(thresholds: ThresholdTable) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    /// Status bucket for a percentage
    pub fn status_for(&self, percentage: f64) -> HealthStatus {
        HealthStatus::from_bucket(self.thresholds.bucket(percentage))
    }

    /// Classify `spent` against `budgeted`
    pub fn classify(&self, spent: f64, budgeted: f64) -> BudgetStatus {
        let percentage = spend_percentage(spent, budgeted);
        BudgetStatus::new(self.status_for(percentage), percentage)
    }
}

/// Classify with the default thresholds
pub fn classify(spent: f64, budgeted: f64) -> BudgetStatus {
    StatusClassifier::default().classify(spent, budgeted)
}
