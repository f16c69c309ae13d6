//! Persisted icon state: current variant plus a bounded change history
//!
//! Icon state is cosmetic. Every operation here is best-effort: storage
//! failures are logged and downgraded to a no-op (or `None`/empty result),
//! never returned to the caller.
//!
//! # Storage layout
//!
//! - `currentAppIcon`: one of the variant tags (`excellent`, `good`, ...)
//! - `iconHistory`: JSON array of [`IconChangeLogEntry`], oldest first,
//!   capped at the configured history limit

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{variant_for, AppIconVariant, IconSelector};
use crate::clock::{Clock, SystemClock};
use crate::config::{HealthConfig, DEFAULT_HISTORY_LIMIT};
use crate::kv::KeyValueStore;
use crate::status::percentage_serde;

/// Key holding the current variant tag
pub const CURRENT_ICON_KEY: &str = "currentAppIcon";
/// Key holding the serialized change history
pub const ICON_HISTORY_KEY: &str = "iconHistory";
/// Returned by `describe_current` when no variant is stored
pub const UNKNOWN_ICON_DESCRIPTION: &str = "Unknown icon state";

/// Platform the app runs on, for the alternate-icon capability check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Ios,
    Android,
    Desktop,
}

impl Platform {
    /// Platform of the current build target
    pub fn current() -> Self {
        if cfg!(target_os = "ios") {
            Self::Ios
        } else if cfg!(target_os = "android") {
            Self::Android
        } else {
            Self::Desktop
        }
    }

    /// Whether the OS lets an app swap its launcher icon
    pub fn supports_alternate_icons(&self) -> bool {
        matches!(self, Self::Ios | Self::Android)
    }
}

/// One recorded icon change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconChangeLogEntry {
    pub timestamp: DateTime<Utc>,
    pub from_variant: AppIconVariant,
    pub to_variant: AppIconVariant,
    /// JSON has no infinity; non-finite values are stored as `null` and read
    /// back as +inf (the zero-budget case)
    #[serde(with = "percentage_serde")]
    pub budget_percentage: f64,
    pub reason: String,
}

/// Icon state backed by an injected key-value store
#[derive(Clone)]
pub struct IconStateStore {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    selector: IconSelector,
    history_limit: usize,
    platform: Platform,
}

impl IconStateStore {
    /// Create a store with default thresholds, the system clock and the
    /// build target's platform
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            selector: IconSelector::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            platform: Platform::current(),
        }
    }

    /// Apply icon thresholds and history limit from configuration
    pub fn with_config(mut self, config: &HealthConfig) -> Self {
        self.selector = IconSelector::new(config.icon_thresholds);
        self.history_limit = config.history_limit.max(1);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// Whether the platform supports alternate app icons (no I/O)
    pub fn is_supported(&self) -> bool {
        self.platform.supports_alternate_icons()
    }

    /// Persist the variant matching a color/status pair; unknown pairs
    /// persist `Good`
    pub async fn set_current_variant(&self, color: &str, status: &str) {
        let variant = variant_for(color, status);
        debug!(color, status, variant = variant.as_str(), "Resolved icon variant");
        self.write_variant(variant).await;
    }

    /// Stored variant, or `None` when unset, unreadable or unrecognized
    pub async fn get_current_variant(&self) -> Option<AppIconVariant> {
        match self.store.get(CURRENT_ICON_KEY).await {
            Ok(Some(tag)) => match tag.parse::<AppIconVariant>() {
                Ok(variant) => Some(variant),
                Err(e) => {
                    warn!(key = CURRENT_ICON_KEY, error = %e, "Ignoring stored icon variant");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key = CURRENT_ICON_KEY, error = %e, "Failed to read icon variant");
                None
            }
        }
    }

    /// Derive the variant for `budget_percentage` and persist it as current
    pub async fn initialize(&self, budget_percentage: f64) {
        let variant = self.selector.select(budget_percentage);
        info!(
            variant = variant.as_str(),
            budget_percentage, "Initializing app icon"
        );
        self.write_variant(variant).await;
    }

    /// Force the stored variant back to `Good`
    pub async fn reset(&self) {
        self.write_variant(AppIconVariant::Good).await;
    }

    /// Description of the stored variant, or the unknown sentinel
    pub async fn describe_current(&self) -> &'static str {
        self.get_current_variant()
            .await
            .map(|v| v.config().description)
            .unwrap_or(UNKNOWN_ICON_DESCRIPTION)
    }

    /// Append a change entry timestamped now, keeping only the most recent
    /// entries up to the history limit
    ///
    /// This is an unguarded read-modify-write: two concurrent appends against
    /// the same backing store can race and one entry may be lost. The log is
    /// informational, so that is tolerated.
    pub async fn append_history(
        &self,
        from: AppIconVariant,
        to: AppIconVariant,
        budget_percentage: f64,
        reason: &str,
    ) {
        let entry = IconChangeLogEntry {
            timestamp: self.clock.now(),
            from_variant: from,
            to_variant: to,
            budget_percentage,
            reason: reason.to_string(),
        };
        self.record(entry).await;
    }

    /// Persisted history, oldest first; empty when absent or unreadable
    pub async fn history(&self) -> Vec<IconChangeLogEntry> {
        let raw = match self.store.get(ICON_HISTORY_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key = ICON_HISTORY_KEY, error = %e, "Failed to read icon history");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(key = ICON_HISTORY_KEY, error = %e, "Discarding unreadable icon history");
            Vec::new()
        })
    }

    /// Delete the persisted history
    pub async fn clear_history(&self) {
        if let Err(e) = self.store.remove(ICON_HISTORY_KEY).await {
            warn!(key = ICON_HISTORY_KEY, error = %e, "Failed to clear icon history");
        }
    }

    /// Move the icon to the variant for `budget_percentage` if it changed
    ///
    /// An unset icon counts as `Good`. Returns the recorded change, or `None`
    /// when nothing changed or the new variant could not be persisted.
    pub async fn sync(&self, budget_percentage: f64, reason: &str) -> Option<IconChangeLogEntry> {
        let from = self
            .get_current_variant()
            .await
            .unwrap_or(AppIconVariant::Good);
        let to = self.selector.select(budget_percentage);

        if from == to {
            debug!(variant = to.as_str(), "App icon unchanged");
            return None;
        }

        if !self.write_variant(to).await {
            return None;
        }

        let entry = IconChangeLogEntry {
            timestamp: self.clock.now(),
            from_variant: from,
            to_variant: to,
            budget_percentage,
            reason: reason.to_string(),
        };
        self.record(entry.clone()).await;

        info!(
            from = from.as_str(),
            to = to.as_str(),
            budget_percentage,
            "App icon changed"
        );
        Some(entry)
    }

    async fn write_variant(&self, variant: AppIconVariant) -> bool {
        match self.store.set(CURRENT_ICON_KEY, variant.as_str()).await {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    key = CURRENT_ICON_KEY,
                    variant = variant.as_str(),
                    error = %e,
                    "Failed to persist icon variant"
                );
                false
            }
        }
    }

    async fn record(&self, entry: IconChangeLogEntry) {
        let mut history = self.history().await;
        history.push(entry);

        if history.len() > self.history_limit {
            let excess = history.len() - self.history_limit;
            history.drain(..excess);
        }

        let serialized = match serde_json::to_string(&history) {
            Ok(s) => s,
            Err(e) => {
                warn!(key = ICON_HISTORY_KEY, error = %e, "Failed to serialize icon history");
                return;
            }
        };

        if let Err(e) = self.store.set(ICON_HISTORY_KEY, &serialized).await {
            warn!(key = ICON_HISTORY_KEY, error = %e, "Failed to persist icon history");
        }
    }
}
