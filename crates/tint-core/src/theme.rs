//! Theme generation from a classified status

use serde::{Deserialize, Serialize};

use crate::color::{darken, lighten, ColorScale, Rgb};
use crate::status::{BudgetStatus, HealthStatus};

/// Structural colors that do not follow budget health
pub const BACKGROUND: &str = "#F8FAFC";
pub const SURFACE: &str = "#FFFFFF";
pub const TEXT: &str = "#0F172A";
pub const TEXT_SECONDARY: &str = "#64748B";

/// How far the light/dark variants are mixed toward white/black
const LIGHT_MIX: f64 = 0.35;
const DARK_MIX: f64 = 0.25;

/// A full palette, every entry a `#RRGGBB` string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicTheme {
    pub primary: String,
    pub primary_light: String,
    pub primary_dark: String,
    pub accent: String,
    pub background: String,
    pub surface: String,
    pub text: String,
    pub text_secondary: String,
}

impl DynamicTheme {
    /// Overwrite `primary` and `accent` with a continuous color, leaving the
    /// light/dark variants derived from the discrete status
    pub fn with_smooth_primary(mut self, color: impl Into<String>) -> Self {
        let color = color.into();
        self.accent = color.clone();
        self.primary = color;
        self
    }
}

/// Build a theme whose primary family derives from `status.color`
///
/// A malformed color falls back to the "good" status color.
pub fn generate_theme(status: &BudgetStatus) -> DynamicTheme {
    let base = Rgb::from_hex(&status.color).unwrap_or_else(|_| {
        tracing::debug!(color = %status.color, "Unparseable status color, using good");
        HealthStatus::Good.rgb()
    });

    DynamicTheme {
        primary: base.to_hex(),
        primary_light: lighten(base, LIGHT_MIX).to_hex(),
        primary_dark: darken(base, DARK_MIX).to_hex(),
        accent: base.to_hex(),
        background: BACKGROUND.to_string(),
        surface: SURFACE.to_string(),
        text: TEXT.to_string(),
        text_secondary: TEXT_SECONDARY.to_string(),
    }
}

/// Theme for `status` with the primary/accent replaced by the gradient color
/// at `status.percentage`
pub fn generate_smooth_theme(status: &BudgetStatus, scale: &ColorScale) -> DynamicTheme {
    generate_theme(status).with_smooth_primary(scale.color_at(status.percentage).to_hex())
}
