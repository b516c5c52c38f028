//! Buy-pressure classification and the continuous red → yellow → green scale.
//!
//! Bucket boundaries are fixed:
//! - `> 0.667` extreme, `> 0.60` strong, `> 0.55` buy
//! - `< 0.333` weak, `< 0.45` caution
//! - everything else (including exactly 0.45 and 0.55) neutral

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::BuyPressureStatus;

pub const EXTREME_ABOVE: f64 = 0.667;
pub const STRONG_ABOVE: f64 = 0.60;
pub const BUY_ABOVE: f64 = 0.55;
pub const WEAK_BELOW: f64 = 0.333;
pub const CAUTION_BELOW: f64 = 0.45;

/// Classify a buy-pressure value. NaN maps to [`BuyPressureStatus::Unknown`].
pub fn classify(buy_pressure: f64) -> BuyPressureStatus {
    match buy_pressure {
        p if p.is_nan() => BuyPressureStatus::Unknown,
        p if p > EXTREME_ABOVE => BuyPressureStatus::Extreme,
        p if p > STRONG_ABOVE => BuyPressureStatus::Strong,
        p if p > BUY_ABOVE => BuyPressureStatus::Buy,
        p if p < WEAK_BELOW => BuyPressureStatus::Weak,
        p if p < CAUTION_BELOW => BuyPressureStatus::Caution,
        _ => BuyPressureStatus::Neutral,
    }
}

/// 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const YELLOW: Rgb = Rgb::new(255, 255, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    /// Used for missing pressure. Never produced by the gradient, which always
    /// has either red or green at 255.
    pub const MISSING: Rgb = Rgb::new(128, 128, 128);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb`, lower case.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

/// Gradient color for a buy-pressure value.
///
/// Pressure is clamped to `[0, 1]`. Below 0.5 the red channel stays at 255
/// and green rises from 0; from 0.5 up the green channel stays at 255 and
/// red falls to 0.
pub fn color_for(buy_pressure: f64) -> Rgb {
    if buy_pressure.is_nan() {
        return Rgb::MISSING;
    }
    let p = buy_pressure.clamp(0.0, 1.0);
    if p >= 0.5 {
        let t = (p - 0.5) / 0.5;
        Rgb::new(channel(255.0 * (1.0 - t)), 255, 0)
    } else {
        let t = p / 0.5;
        Rgb::new(255, channel(255.0 * t), 0)
    }
}

fn channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_boundaries() {
        assert_eq!(classify(0.6671), BuyPressureStatus::Extreme);
        assert_eq!(classify(0.667), BuyPressureStatus::Strong);
        assert_eq!(classify(0.61), BuyPressureStatus::Strong);
        assert_eq!(classify(0.60), BuyPressureStatus::Buy);
        assert_eq!(classify(0.551), BuyPressureStatus::Buy);
        assert_eq!(classify(0.55), BuyPressureStatus::Neutral);
        assert_eq!(classify(0.50), BuyPressureStatus::Neutral);
        assert_eq!(classify(0.45), BuyPressureStatus::Neutral);
        assert_eq!(classify(0.449), BuyPressureStatus::Caution);
        assert_eq!(classify(0.333), BuyPressureStatus::Caution);
        assert_eq!(classify(0.3329), BuyPressureStatus::Weak);
        assert_eq!(classify(0.0), BuyPressureStatus::Weak);
    }

    #[test]
    fn out_of_range_values_still_classify() {
        assert_eq!(classify(1.4), BuyPressureStatus::Extreme);
        assert_eq!(classify(-0.2), BuyPressureStatus::Weak);
        assert_eq!(classify(f64::INFINITY), BuyPressureStatus::Extreme);
    }

    #[test]
    fn nan_is_unknown() {
        assert_eq!(classify(f64::NAN), BuyPressureStatus::Unknown);
    }

    #[test]
    fn gradient_anchors() {
        assert_eq!(color_for(0.0).hex(), "#ff0000");
        assert_eq!(color_for(0.5).hex(), "#ffff00");
        assert_eq!(color_for(1.0).hex(), "#00ff00");
        assert_eq!(color_for(-3.0), Rgb::RED);
        assert_eq!(color_for(7.0), Rgb::GREEN);
    }

    #[test]
    fn gradient_midpoints() {
        assert_eq!(color_for(0.25), Rgb::new(255, 128, 0));
        assert_eq!(color_for(0.75), Rgb::new(128, 255, 0));
    }

    // 0.70 sits 40% of the way from yellow to green, so red is still 153.
    // The gradient rule decides the color, not the "pure green" shorthand
    // sometimes quoted for strong pressure.
    #[test]
    fn strong_pressure_follows_gradient_not_pure_green() {
        let c = color_for(0.70);
        assert_eq!(classify(0.70), BuyPressureStatus::Extreme);
        assert_eq!(c, Rgb { r: 153, g: 255, b: 0 });
        assert_eq!(c.hex(), "#99ff00");
    }

    #[test]
    fn missing_pressure_is_gray() {
        assert_eq!(color_for(f64::NAN), Rgb::MISSING);
        assert_eq!(Rgb::MISSING.hex(), "#808080");
    }
}
