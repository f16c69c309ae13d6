//! App icon variants
//!
//! The icon selector has its own threshold table. Its bounds match the status
//! classifier's by default, but the two are configured separately.

pub mod store;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::config::ThresholdTable;
use crate::error::{Error, Result};
use crate::status::HealthStatus;

/// Minimum length of an icon description
pub const MIN_DESCRIPTION_LEN: usize = 10;

/// File extensions accepted for icon assets
const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".webp"];

/// Device icon variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppIconVariant {
    Excellent,
    Good,
    Warning,
    Danger,
    OverBudget,
}

impl AppIconVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::OverBudget => "over_budget",
        }
    }

    pub fn all() -> &'static [AppIconVariant] {
        &[
            Self::Excellent,
            Self::Good,
            Self::Warning,
            Self::Danger,
            Self::OverBudget,
        ]
    }

    pub fn from_bucket(bucket: usize) -> Self {
        match bucket {
            0 => Self::Excellent,
            1 => Self::Good,
            2 => Self::Warning,
            3 => Self::Danger,
            _ => Self::OverBudget,
        }
    }

    /// Static configuration record for this variant
    pub fn config(&self) -> &'static IconConfig {
        match self {
            Self::Excellent => &ICON_CONFIGS[0],
            Self::Good => &ICON_CONFIGS[1],
            Self::Warning => &ICON_CONFIGS[2],
            Self::Danger => &ICON_CONFIGS[3],
            Self::OverBudget => &ICON_CONFIGS[4],
        }
    }
}

impl From<HealthStatus> for AppIconVariant {
    fn from(status: HealthStatus) -> Self {
        match status {
            HealthStatus::Excellent => Self::Excellent,
            HealthStatus::Good => Self::Good,
            HealthStatus::Warning => Self::Warning,
            HealthStatus::Danger => Self::Danger,
            HealthStatus::OverBudget => Self::OverBudget,
        }
    }
}

impl fmt::Display for AppIconVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AppIconVariant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse::<HealthStatus>()
            .map(Self::from)
            .map_err(|_| format!("Unknown icon variant: {}", s))
    }
}

/// Presentation record for one icon variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconConfig {
    pub variant: AppIconVariant,
    pub color: &'static str,
    pub file_name: &'static str,
    pub description: &'static str,
}

/// Icon records, one per variant in severity order
pub static ICON_CONFIGS: [IconConfig; 5] = [
    IconConfig {
        variant: AppIconVariant::Excellent,
        color: "#16A34A",
        file_name: "icon-excellent.png",
        description: "Green icon: spending is well under budget",
    },
    IconConfig {
        variant: AppIconVariant::Good,
        color: "#65A30D",
        file_name: "icon-good.png",
        description: "Lime icon: spending is on track",
    },
    IconConfig {
        variant: AppIconVariant::Warning,
        color: "#EA580C",
        file_name: "icon-warning.png",
        description: "Orange icon: approaching the budget limit",
    },
    IconConfig {
        variant: AppIconVariant::Danger,
        color: "#DC2626",
        file_name: "icon-danger.png",
        description: "Red icon: budget limit reached",
    },
    IconConfig {
        variant: AppIconVariant::OverBudget,
        color: "#7F1D1D",
        file_name: "icon-over-budget.png",
        description: "Dark red icon: spending is over budget",
    },
];

/// Check a set of icon records: every variant present once, valid hex
/// colors, pairwise distinct colors, image file names and non-trivial
/// descriptions
pub fn validate_icon_configs(configs: &[IconConfig]) -> Result<()> {
    for variant in AppIconVariant::all() {
        let count = configs.iter().filter(|c| c.variant == *variant).count();
        if count != 1 {
            return Err(Error::InvalidData(format!(
                "Expected exactly one icon config for {}, found {}",
                variant, count
            )));
        }
    }

    let mut colors = Vec::with_capacity(configs.len());
    for config in configs {
        let color = Rgb::from_hex(config.color)?;
        if colors.contains(&color) {
            return Err(Error::InvalidData(format!(
                "Icon color {} is used by more than one variant",
                config.color
            )));
        }
        colors.push(color);

        let file_name = config.file_name.to_lowercase();
        if !IMAGE_EXTENSIONS.iter().any(|ext| file_name.ends_with(ext)) {
            return Err(Error::InvalidData(format!(
                "Icon file for {} is not an image: {}",
                config.variant, config.file_name
            )));
        }

        if config.description.trim().len() < MIN_DESCRIPTION_LEN {
            return Err(Error::InvalidData(format!(
                "Icon description for {} is too short",
                config.variant
            )));
        }
    }

    Ok(())
}

/// Maps spend percentages onto icon variants
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IconSelector {
    thresholds: ThresholdTable,
}

impl IconSelector {
    pub fn new(thresholds: ThresholdTable) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    /// Variant for a percentage; total over all reals including +/-inf
    pub fn select(&self, percentage: f64) -> AppIconVariant {
        AppIconVariant::from_bucket(self.thresholds.bucket(percentage))
    }
}

/// Select with the default icon thresholds
pub fn select_variant(percentage: f64) -> AppIconVariant {
    IconSelector::default().select(percentage)
}

/// Resolve a variant from a status label and/or color
///
/// A recognized status label wins. Otherwise the color is matched against
/// the icon and status palettes. Anything else resolves to `Good`.
pub fn variant_for(color: &str, status: &str) -> AppIconVariant {
    if let Ok(variant) = status.parse::<AppIconVariant>() {
        return variant;
    }

    if let Ok(rgb) = Rgb::from_hex(color.trim()) {
        let by_icon = AppIconVariant::all()
            .iter()
            .find(|v| Rgb::from_hex(v.config().color).ok() == Some(rgb));
        if let Some(variant) = by_icon {
            return *variant;
        }

        let by_status = HealthStatus::all().iter().find(|s| s.rgb() == rgb);
        if let Some(status) = by_status {
            return AppIconVariant::from(*status);
        }
    }

    AppIconVariant::Good
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_variant_boundaries() {
        let cases = [
            (49.0, AppIconVariant::Excellent),
            (50.0, AppIconVariant::Good),
            (74.0, AppIconVariant::Good),
            (75.0, AppIconVariant::Warning),
            (99.0, AppIconVariant::Warning),
            (100.0, AppIconVariant::Danger),
            (109.0, AppIconVariant::Danger),
            (110.0, AppIconVariant::OverBudget),
        ];
        for (pct, expected) in cases {
            assert_eq!(select_variant(pct), expected, "at {}%", pct);
        }
    }

    #[test]
    fn test_select_variant_extremes() {
        assert_eq!(select_variant(-250.0), AppIconVariant::Excellent);
        assert_eq!(select_variant(f64::NEG_INFINITY), AppIconVariant::Excellent);
        assert_eq!(select_variant(f64::INFINITY), AppIconVariant::OverBudget);
    }

    #[test]
    fn test_select_variant_monotonic() {
        let mut prev = select_variant(-100.0);
        for i in -1000..=2500 {
            let next = select_variant(f64::from(i) / 10.0);
            assert!(next >= prev);
            prev = next;
        }
    }

    #[test]
    fn test_selector_independent_of_classifier() {
        let selector = IconSelector::new(ThresholdTable {
            good: 30.0,
            warning: 60.0,
            danger: 90.0,
            over_budget: 120.0,
        });
        assert_eq!(selector.select(95.0), AppIconVariant::Danger);
        assert_eq!(select_variant(95.0), AppIconVariant::Warning);
    }

    #[test]
    fn test_builtin_configs_are_valid() {
        validate_icon_configs(&ICON_CONFIGS).unwrap();
        for variant in AppIconVariant::all() {
            assert_eq!(variant.config().variant, *variant);
        }
    }

    #[test]
    fn test_validate_rejects_duplicate_colors() {
        let mut configs = ICON_CONFIGS.clone();
        configs[1].color = configs[0].color;
        assert!(validate_icon_configs(&configs).is_err());
    }

    #[test]
    fn test_validate_rejects_missing_variant() {
        assert!(validate_icon_configs(&ICON_CONFIGS[..4]).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_assets_and_descriptions() {
        let mut configs = ICON_CONFIGS.clone();
        configs[2].file_name = "icon-warning.txt";
        assert!(validate_icon_configs(&configs).is_err());

        let mut configs = ICON_CONFIGS.clone();
        configs[3].description = "Red";
        assert!(validate_icon_configs(&configs).is_err());

        let mut configs = ICON_CONFIGS.clone();
        configs[4].color = "#12345";
        assert!(validate_icon_configs(&configs).is_err());
    }

    #[test]
    fn test_variant_for_status_label() {
        assert_eq!(variant_for("", "danger"), AppIconVariant::Danger);
        assert_eq!(variant_for("#16A34A", "over_budget"), AppIconVariant::OverBudget);
    }

    #[test]
    fn test_variant_for_color_only() {
        assert_eq!(variant_for("#ea580c", "?"), AppIconVariant::Warning);
        assert_eq!(
            variant_for(&HealthStatus::Danger.color(), "unknown"),
            AppIconVariant::Danger
        );
    }

    #[test]
    fn test_variant_for_unknown_falls_back_to_good() {
        assert_eq!(variant_for("#000000", "mystery"), AppIconVariant::Good);
        assert_eq!(variant_for("purple", ""), AppIconVariant::Good);
    }

    #[test]
    fn test_variant_serde_and_parse() {
        assert_eq!(
            serde_json::to_string(&AppIconVariant::OverBudget).unwrap(),
            "\"over_budget\""
        );
        for variant in AppIconVariant::all() {
            assert_eq!(variant.as_str().parse::<AppIconVariant>().unwrap(), *variant);
        }
        assert!("sparkly".parse::<AppIconVariant>().is_err());
    }
}
