use serde::{Deserialize, Serialize};

use crate::core::PAD;
use crate::error::{Result, RippleError};

/// Canvas side length in logical pixels
pub const DEFAULT_CANVAS_SIZE: u32 = 400;
pub const DEFAULT_TICKS_PER_SECOND: u32 = 40;
pub const DEFAULT_ALT_TEXT: &str = "Animated water ripple over the company logo";

/// Largest accepted canvas side; keeps every buffer length well inside `u32`
pub const MAX_CANVAS_SIZE: u32 = 4096;
pub const MAX_HOVER_DROPLETS: u32 = 64;
pub const MAX_HOVER_SPACING_MS: u32 = 10_000;

/// Simulation constants, fixed for the lifetime of one `RippleCore`.
///
/// Every field has a default, so a JSON override may name only the values it
/// changes: `{"damping": 0.95}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RippleConfig {
    /// Internal canvas resolution (square)
    pub canvas_size: u32,
    pub ticks_per_second: u32,
    /// Energy kept per tick, in (0, 1)
    pub damping: f32,
    /// Height -> pixel sampling offset
    pub displacement_factor: f32,
    /// Height -> brightness delta
    pub luminance_factor: f32,
    /// Inject one ambient droplet every N ticks; 0 disables
    pub ambient_interval_ticks: u32,
    pub ambient_intensity: f32,
    /// Pointer move / click
    pub pointer_intensity: f32,
    /// Pointer enter burst
    pub hover_intensity: f32,
    pub hover_droplets: u32,
    pub hover_spacing_ms: u32,
    /// Black overlay opacity over the background
    pub overlay_alpha: f32,
    /// Logo side as a fraction of the shorter canvas dimension
    pub logo_scale: f32,
    pub seed: u32,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            canvas_size: DEFAULT_CANVAS_SIZE,
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            damping: 0.97,
            displacement_factor: 0.02,
            luminance_factor: 0.15,
            ambient_interval_ticks: 8,
            ambient_intensity: 96.0,
            pointer_intensity: 192.0,
            hover_intensity: 320.0,
            hover_droplets: 5,
            hover_spacing_ms: 100,
            overlay_alpha: 0.5,
            logo_scale: 0.3,
            seed: 12345,
        }
    }
}

impl RippleConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: RippleConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Milliseconds between ticks
    pub fn tick_interval_ms(&self) -> i32 {
        (1000 / self.ticks_per_second.max(1)) as i32
    }

    /// Simulated milliseconds per tick (un-rounded)
    pub fn tick_ms(&self) -> f64 {
        1000.0 / self.ticks_per_second.max(1) as f64
    }

    /// Logo side in pixels for a `width x height` canvas
    pub fn logo_side(&self, width: u32, height: u32) -> u32 {
        (width.min(height) as f32 * self.logo_scale).round() as u32
    }

    pub fn validate(&self) -> Result<()> {
        let min_side = 2 * PAD + 1;
        if !(min_side..=MAX_CANVAS_SIZE).contains(&self.canvas_size) {
            return Err(invalid(format!(
                "canvas_size must be in {min_side}..={MAX_CANVAS_SIZE}, got {}",
                self.canvas_size
            )));
        }
        if !(1..=240).contains(&self.ticks_per_second) {
            return Err(invalid(format!(
                "ticks_per_second must be in 1..=240, got {}",
                self.ticks_per_second
            )));
        }
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(invalid(format!("damping must be in (0, 1), got {}", self.damping)));
        }
        for (name, value) in [
            ("displacement_factor", self.displacement_factor),
            ("luminance_factor", self.luminance_factor),
            ("ambient_intensity", self.ambient_intensity),
            ("pointer_intensity", self.pointer_intensity),
            ("hover_intensity", self.hover_intensity),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!("{name} must be finite and >= 0, got {value}")));
            }
        }
        if self.hover_droplets > MAX_HOVER_DROPLETS {
            return Err(invalid(format!(
                "hover_droplets must be at most {MAX_HOVER_DROPLETS}, got {}",
                self.hover_droplets
            )));
        }
        if self.hover_spacing_ms > MAX_HOVER_SPACING_MS {
            return Err(invalid(format!(
                "hover_spacing_ms must be at most {MAX_HOVER_SPACING_MS}, got {}",
                self.hover_spacing_ms
            )));
        }
        if !(0.0..=1.0).contains(&self.overlay_alpha) {
            return Err(invalid(format!(
                "overlay_alpha must be in [0, 1], got {}",
                self.overlay_alpha
            )));
        }
        if !(self.logo_scale > 0.0 && self.logo_scale <= 1.0) {
            return Err(invalid(format!(
                "logo_scale must be in (0, 1], got {}",
                self.logo_scale
            )));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> RippleError {
    RippleError::InvalidConfig(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = RippleConfig::default();
        config.validate().expect("defaults should validate");
        assert_eq!(config.tick_interval_ms(), 25);
        assert_eq!(config.logo_side(400, 400), 120);
        assert!(config.pointer_intensity > config.ambient_intensity);
        assert!(config.hover_intensity > config.pointer_intensity);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = RippleConfig::from_json(r#"{"damping": 0.9, "ambient_interval_ticks": 0}"#)
            .expect("partial json should parse");
        assert_eq!(config.damping, 0.9);
        assert_eq!(config.ambient_interval_ticks, 0);
        assert_eq!(config.canvas_size, DEFAULT_CANVAS_SIZE);
    }

    #[test]
    fn json_round_trips_through_export() {
        let mut config = RippleConfig::default();
        config.seed = 7;
        let parsed = RippleConfig::from_json(&config.to_json()).expect("exported json parses");
        assert_eq!(parsed, config);
    }

    #[test]
    fn rejects_out_of_range_values() {
        for json in [
            r#"{"damping": 1.0}"#,
            r#"{"damping": 0.0}"#,
            r#"{"ticks_per_second": 0}"#,
            r#"{"canvas_size": 4}"#,
            r#"{"canvas_size": 4097}"#,
            r#"{"canvas_size": 4294967295}"#,
            r#"{"hover_droplets": 65}"#,
            r#"{"hover_droplets": 4294967295}"#,
            r#"{"hover_spacing_ms": 10001}"#,
            r#"{"overlay_alpha": 1.5}"#,
            r#"{"logo_scale": 0.0}"#,
            r#"{"pointer_intensity": -1.0}"#,
        ] {
            let err = RippleConfig::from_json(json).unwrap_err();
            assert!(matches!(err, RippleError::InvalidConfig(_)), "{json}: {err}");
        }
    }

    #[test]
    fn accepts_values_at_the_upper_bounds() {
        let json = format!(
            r#"{{"canvas_size": {MAX_CANVAS_SIZE}, "hover_droplets": {MAX_HOVER_DROPLETS}, "hover_spacing_ms": {MAX_HOVER_SPACING_MS}}}"#
        );
        let config = RippleConfig::from_json(&json).expect("bounds are inclusive");
        assert_eq!(config.canvas_size, MAX_CANVAS_SIZE);
        assert_eq!(config.hover_droplets, MAX_HOVER_DROPLETS);
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = RippleConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, RippleError::ConfigJson(_)));
    }
}
