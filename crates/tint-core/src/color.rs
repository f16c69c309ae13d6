//! Colors and continuous interpolation
//!
//! The discrete status colors come from the classifier. This module supplies
//! the continuous counterpart: a gradient across anchor points so that a small
//! change in percentage never produces a visible jump in the primary color.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::status::HealthStatus;

/// An opaque 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RRGGBB` hex string (case-insensitive)
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex
            .strip_prefix('#')
            .filter(|d| d.len() == 6 && d.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| Error::InvalidData(format!("Invalid hex color: {}", hex)))?;

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|e| Error::InvalidData(format!("Invalid hex color {}: {}", hex, e)))
        };

        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Format as an uppercase `#RRGGBB` string
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Euclidean distance in RGB space
    pub fn distance(&self, other: &Rgb) -> f64 {
        let dr = f64::from(self.r) - f64::from(other.r);
        let dg = f64::from(self.g) - f64::from(other.g);
        let db = f64::from(self.b) - f64::from(other.b);
        (dr * dr + dg * dg + db * db).sqrt()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Whether `hex` is a well-formed `#RRGGBB` color
pub fn is_valid_hex(hex: &str) -> bool {
    Rgb::from_hex(hex).is_ok()
}

/// Linear interpolation between two channel values
pub fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
    let t = t.clamp(0.0, 1.0);
    let result = f64::from(a) * (1.0 - t) + f64::from(b) * t;
    result.round() as u8
}

/// Interpolate each channel independently
pub fn lerp_rgb(from: Rgb, to: Rgb, t: f64) -> Rgb {
    Rgb::new(
        lerp_u8(from.r, to.r, t),
        lerp_u8(from.g, to.g, t),
        lerp_u8(from.b, to.b, t),
    )
}

/// Mix toward white by `amount` (0.0 = unchanged, 1.0 = white)
pub fn lighten(color: Rgb, amount: f64) -> Rgb {
    lerp_rgb(color, Rgb::WHITE, amount)
}

/// Mix toward black by `amount` (0.0 = unchanged, 1.0 = black)
pub fn darken(color: Rgb, amount: f64) -> Rgb {
    lerp_rgb(color, Rgb::BLACK, amount)
}

/// Ordered (percentage, color) anchors with linear interpolation between them
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    anchors: Vec<(f64, Rgb)>,
}

impl ColorScale {
    /// Build a scale from anchors sorted by strictly increasing percentage
    pub fn new(anchors: Vec<(f64, Rgb)>) -> Result<Self> {
        if anchors.is_empty() {
            return Err(Error::InvalidData("Color scale needs at least one anchor".into()));
        }
        if anchors.iter().any(|(p, _)| !p.is_finite()) {
            return Err(Error::InvalidData("Color scale anchors must be finite".into()));
        }
        if anchors.windows(2).any(|w| w[0].0 >= w[1].0) {
            return Err(Error::InvalidData(
                "Color scale anchors must be strictly increasing".into(),
            ));
        }
        Ok(Self { anchors })
    }

    /// The budget health gradient: each status color at a representative
    /// percentage, clamped beyond 0% and 125%.
    pub fn budget() -> Self {
        Self {
            anchors: vec![
                (0.0, HealthStatus::Excellent.rgb()),
                (50.0, HealthStatus::Good.rgb()),
                (75.0, HealthStatus::Warning.rgb()),
                (100.0, HealthStatus::Danger.rgb()),
                (125.0, HealthStatus::OverBudget.rgb()),
            ],
        }
    }

    pub fn anchors(&self) -> &[(f64, Rgb)] {
        &self.anchors
    }

    /// Color at `percentage`, clamped to the first and last anchors
    pub fn color_at(&self, percentage: f64) -> Rgb {
        let (first_pct, first) = self.anchors[0];
        let (last_pct, last) = self.anchors[self.anchors.len() - 1];

        // NaN fails every comparison below, so pin it to the start
        if percentage.is_nan() || percentage <= first_pct {
            return first;
        }
        if percentage >= last_pct {
            return last;
        }

        for pair in self.anchors.windows(2) {
            let (lo_pct, lo) = pair[0];
            let (hi_pct, hi) = pair[1];
            if percentage <= hi_pct {
                let t = (percentage - lo_pct) / (hi_pct - lo_pct);
                return lerp_rgb(lo, hi, t);
            }
        }

        last
    }
}

impl Default for ColorScale {
    fn default() -> Self {
        Self::budget()
    }
}

/// Continuous hex color for a spend percentage on the budget gradient
pub fn smooth_color(percentage: f64) -> String {
    ColorScale::budget().color_at(percentage).to_hex()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_channel_step(a: Rgb, b: Rgb) -> u8 {
        a.r.abs_diff(b.r).max(a.g.abs_diff(b.g)).max(a.b.abs_diff(b.b))
    }

    #[test]
    fn test_hex_roundtrip_and_case() {
        let c = Rgb::from_hex("#f97316").unwrap();
        assert_eq!(c, Rgb::new(249, 115, 22));
        assert_eq!(c.to_hex(), "#F97316");
    }

    #[test]
    fn test_invalid_hex_rejected() {
        for bad in ["F97316", "#F9731", "#F973166", "#GG0000", "", "#"] {
            assert!(!is_valid_hex(bad), "{} should be invalid", bad);
        }
    }

    #[test]
    fn test_lerp_u8_extremes_and_clamp() {
        assert_eq!(lerp_u8(0, 255, 0.0), 0);
        assert_eq!(lerp_u8(0, 255, 1.0), 255);
        assert_eq!(lerp_u8(0, 200, 0.5), 100);
        assert_eq!(lerp_u8(0, 100, -1.0), 0);
        assert_eq!(lerp_u8(0, 100, 2.0), 100);
    }

    #[test]
    fn test_lighten_darken() {
        let c = Rgb::new(100, 100, 100);
        assert_eq!(lighten(c, 0.0), c);
        assert_eq!(lighten(c, 1.0), Rgb::WHITE);
        assert_eq!(darken(c, 1.0), Rgb::BLACK);
        assert_eq!(darken(c, 0.5), Rgb::new(50, 50, 50));
    }

    #[test]
    fn test_anchor_colors_hit_exactly() {
        assert_eq!(smooth_color(0.0), HealthStatus::Excellent.color());
        assert_eq!(smooth_color(50.0), HealthStatus::Good.color());
        assert_eq!(smooth_color(75.0), HealthStatus::Warning.color());
        assert_eq!(smooth_color(100.0), HealthStatus::Danger.color());
        assert_eq!(smooth_color(125.0), HealthStatus::OverBudget.color());
    }

    #[test]
    fn test_clamps_outside_anchor_range() {
        assert_eq!(smooth_color(-40.0), HealthStatus::Excellent.color());
        assert_eq!(smooth_color(f64::NEG_INFINITY), HealthStatus::Excellent.color());
        assert_eq!(smooth_color(500.0), HealthStatus::OverBudget.color());
        assert_eq!(smooth_color(f64::INFINITY), HealthStatus::OverBudget.color());
        assert_eq!(smooth_color(f64::NAN), HealthStatus::Excellent.color());
    }

    #[test]
    fn test_midpoint_is_interpolated() {
        // Halfway between excellent (34,197,94) and good (132,204,22)
        assert_eq!(ColorScale::budget().color_at(25.0), Rgb::new(83, 201, 58));
    }

    #[test]
    fn test_continuous_across_whole_range() {
        let scale = ColorScale::budget();
        let mut prev = scale.color_at(-10.0);
        for i in -99..=1400 {
            let p = f64::from(i) / 10.0;
            let next = scale.color_at(p);
            assert!(
                max_channel_step(prev, next) <= 1,
                "jump at {}%: {} -> {}",
                p,
                prev,
                next
            );
            prev = next;
        }
    }

    #[test]
    fn test_no_jump_at_classifier_boundaries() {
        let scale = ColorScale::budget();
        for boundary in [50.0, 75.0, 100.0, 110.0] {
            let below = scale.color_at(boundary - 0.001);
            let at = scale.color_at(boundary);
            assert!(max_channel_step(below, at) <= 1, "jump at {}", boundary);
        }
    }

    #[test]
    fn test_distance_from_excellent_grows_within_segments() {
        let scale = ColorScale::budget();
        let origin = scale.anchors()[0].1;
        for pair in scale.anchors().windows(2) {
            let (lo, hi) = (pair[0].0 as i32, pair[1].0 as i32);
            let mut prev = -1.0;
            for p in lo..=hi {
                let d = scale.color_at(f64::from(p)).distance(&origin);
                assert!(d >= prev, "distance shrank at {}%", p);
                prev = d;
            }
        }
    }

    #[test]
    fn test_scale_rejects_unordered_anchors() {
        let anchors = vec![(50.0, Rgb::WHITE), (10.0, Rgb::BLACK)];
        assert!(ColorScale::new(anchors).is_err());
        assert!(ColorScale::new(vec![]).is_err());
    }

    #[test]
    fn test_single_anchor_scale_is_constant() {
        let scale = ColorScale::new(vec![(0.0, Rgb::WHITE)]).unwrap();
        assert_eq!(scale.color_at(-5.0), Rgb::WHITE);
        assert_eq!(scale.color_at(500.0), Rgb::WHITE);
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&Rgb::new(255, 0, 27)).unwrap();
        assert_eq!(json, "\"#FF001B\"");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgb::new(255, 0, 27));
        assert!(serde_json::from_str::<Rgb>("\"red\"").is_err());
    }
}
