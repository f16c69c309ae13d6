//! Tint Core Library
//!
//! Derives a qualitative budget health state from spend/budget numbers and
//! feeds it into two presentation channels:
//! - Discrete status classification and aggregation across budgets
//! - Continuous color interpolation for smooth theme transitions
//! - Theme generation from a classified status
//! - App icon variant selection with a persisted change history
//! - A reactive controller that recomputes everything when budget data changes

pub mod aggregate;
pub mod clock;
pub mod color;
pub mod config;
pub mod controller;
pub mod error;
pub mod icon;
pub mod kv;
pub mod models;
pub mod status;
pub mod theme;

/// Test utilities including failing stores and fixtures
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use aggregate::aggregate_overall;
pub use clock::{Clock, FixedClock, SystemClock};
pub use color::{smooth_color, ColorScale, Rgb};
pub use config::{HealthConfig, ThresholdTable};
pub use controller::{BudgetFeed, FeedSnapshot, HealthSnapshot, ReactiveController, SubscriptionId};
pub use error::{Error, Result};
pub use icon::store::{IconChangeLogEntry, IconStateStore, Platform};
pub use icon::{select_variant, AppIconVariant, IconConfig, IconSelector};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use models::{Budget, BudgetPeriod, Transaction};
pub use status::{classify, BudgetStatus, HealthStatus, StatusClassifier};
pub use theme::{generate_theme, DynamicTheme};
