//! Health configuration: threshold tables, transition window, history cap
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/tint/config/health.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! The status and icon threshold tables are read independently. They share
//! default values today, but a change to one must never move the other.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/health.toml");

/// Lower bound of the excellent bucket. The bucket is unbounded below, so
/// negative spend (refunds) still classifies as excellent.
pub const EXCELLENT: f64 = 0.0;
/// Lower bound of the good bucket (percent of budget spent)
pub const GOOD: f64 = 50.0;
/// Lower bound of the warning bucket
pub const WARNING: f64 = 75.0;
/// Lower bound of the danger bucket
pub const DANGER: f64 = 100.0;
/// Lower bound of the over-budget bucket
pub const OVER_BUDGET: f64 = 110.0;

/// Default visual transition window for the reactive controller
pub const DEFAULT_TRANSITION_WINDOW: Duration = Duration::from_millis(300);

/// Default number of icon change entries kept in the persisted log
pub const DEFAULT_HISTORY_LIMIT: usize = 30;

/// Lower-inclusive bounds partitioning percentages into five ordered buckets
///
/// Bucket 0 covers `[-inf, good)`, bucket 4 covers `[over_budget, +inf]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdTable {
    pub good: f64,
    pub warning: f64,
    pub danger: f64,
    pub over_budget: f64,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self {
            good: GOOD,
            warning: WARNING,
            danger: DANGER,
            over_budget: OVER_BUDGET,
        }
    }
}

impl ThresholdTable {
    /// Check that bounds are finite and strictly increasing
    pub fn validate(&self) -> Result<()> {
        let bounds = [self.good, self.warning, self.danger, self.over_budget];

        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(Error::Config(format!(
                "Threshold bounds must be finite: {:?}",
                bounds
            )));
        }

        if bounds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::Config(format!(
                "Threshold bounds must be strictly increasing: {:?}",
                bounds
            )));
        }

        Ok(())
    }

    /// Index (0-4) of the bucket containing `percentage`
    ///
    /// NaN compares false against every bound and lands in bucket 0.
    pub fn bucket(&self, percentage: f64) -> usize {
        if percentage >= self.over_budget {
            4
        } else if percentage >= self.danger {
            3
        } else if percentage >= self.warning {
            2
        } else if percentage >= self.good {
            1
        } else {
            0
        }
    }
}

/// Complete health configuration
#[derive(Debug, Clone, PartialEq)]
pub struct HealthConfig {
    /// Bounds used by the status classifier
    pub status_thresholds: ThresholdTable,
    /// Bounds used by the icon variant selector
    pub icon_thresholds: ThresholdTable,
    /// How long `is_transitioning` stays set after a recompute
    pub transition_window: Duration,
    /// Maximum persisted icon history length
    pub history_limit: usize,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            status_thresholds: ThresholdTable::default(),
            icon_thresholds: ThresholdTable::default(),
            transition_window: DEFAULT_TRANSITION_WINDOW,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl HealthConfig {
    /// Load configuration (override first, then embedded default)
    ///
    /// An explicit path must exist; the per-user file is optional.
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = override_path {
            return Self::parse(&read_config(path)?);
        }

        let content = match default_config_path() {
            Some(path) if path.exists() => read_config(&path)?,
            _ => DEFAULT_CONFIG.to_string(),
        };

        Self::parse(&content)
    }

    /// Parse config from TOML content, filling gaps from the defaults
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

        let mut config = HealthConfig::default();

        if let Some(table) = raw.status_thresholds {
            config.status_thresholds = table.apply(config.status_thresholds);
        }
        if let Some(table) = raw.icon_thresholds {
            config.icon_thresholds = table.apply(config.icon_thresholds);
        }
        if let Some(window) = raw.transition.and_then(|t| t.window_ms) {
            config.transition_window = Duration::from_millis(window);
        }
        if let Some(limit) = raw.history.and_then(|h| h.limit) {
            if limit == 0 {
                return Err(Error::Config("History limit must be at least 1".into()));
            }
            config.history_limit = limit;
        }

        config.status_thresholds.validate()?;
        config.icon_thresholds.validate()?;

        Ok(config)
    }
}

fn read_config(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tint").join("config").join("health.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    status_thresholds: Option<RawThresholds>,
    icon_thresholds: Option<RawThresholds>,
    transition: Option<RawTransition>,
    history: Option<RawHistory>,
}

#[derive(Debug, Deserialize)]
struct RawThresholds {
    good: Option<f64>,
    warning: Option<f64>,
    danger: Option<f64>,
    over_budget: Option<f64>,
}

impl RawThresholds {
    fn apply(self, base: ThresholdTable) -> ThresholdTable {
        ThresholdTable {
            good: self.good.unwrap_or(base.good),
            warning: self.warning.unwrap_or(base.warning),
            danger: self.danger.unwrap_or(base.danger),
            over_budget: self.over_budget.unwrap_or(base.over_budget),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawTransition {
    window_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawHistory {
    limit: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_config() {
        let config = HealthConfig::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, HealthConfig::default());
    }

    #[test]
    fn test_default_constants() {
        let table = ThresholdTable::default();
        assert_eq!(EXCELLENT, 0.0);
        assert_eq!(table.good, 50.0);
        assert_eq!(table.warning, 75.0);
        assert_eq!(table.danger, 100.0);
        assert_eq!(table.over_budget, 110.0);
    }

    #[test]
    fn test_tables_are_independent() {
        let config = HealthConfig::parse(
            r#"
            [icon_thresholds]
            good = 40.0
            "#,
        )
        .unwrap();

        assert_eq!(config.icon_thresholds.good, 40.0);
        assert_eq!(config.status_thresholds.good, GOOD);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = HealthConfig::parse("[transition]\nwindow_ms = 500\n").unwrap();
        assert_eq!(config.transition_window, Duration::from_millis(500));
        assert_eq!(config.history_limit, DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn test_rejects_unordered_thresholds() {
        let err = HealthConfig::parse("[status_thresholds]\nwarning = 40.0\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_zero_history_limit() {
        assert!(HealthConfig::parse("[history]\nlimit = 0\n").is_err());
    }

    #[test]
    fn test_rejects_invalid_toml() {
        assert!(HealthConfig::parse("not = [valid").is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let table = ThresholdTable {
            over_budget: f64::INFINITY,
            ..Default::default()
        };
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_bucket_boundaries_are_lower_inclusive() {
        let table = ThresholdTable::default();
        assert_eq!(table.bucket(f64::NEG_INFINITY), 0);
        assert_eq!(table.bucket(-10.0), 0);
        assert_eq!(table.bucket(49.999), 0);
        assert_eq!(table.bucket(50.0), 1);
        assert_eq!(table.bucket(75.0), 2);
        assert_eq!(table.bucket(100.0), 3);
        assert_eq!(table.bucket(110.0), 4);
        assert_eq!(table.bucket(f64::INFINITY), 4);
    }

    #[test]
    fn test_load_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("health.toml");
        fs::write(&path, "[history]\nlimit = 5\n").unwrap();

        let config = HealthConfig::load(Some(&path)).unwrap();
        assert_eq!(config.history_limit, 5);
    }

    #[test]
    fn test_load_missing_override_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = HealthConfig::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
