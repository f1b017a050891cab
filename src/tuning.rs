//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads goes through [`Tuning`], so a
//! page can override them with JSON without rebuilding.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::SettingsError;

/// Largest accepted `base_points`
pub const MAX_BASE_POINTS: u64 = 1000;
/// Largest accepted `max_placement_attempts`
pub const MAX_PLACEMENT_ATTEMPTS_CAP: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Timing (ms) ===
    pub lifespan_min_ms: f64,
    pub lifespan_spread_ms: f64,
    pub window_min_ms: f64,
    pub window_spread_ms: f64,
    /// Gap between a resolution and the next spawn
    pub respawn_delay_ms: f64,

    // === Geometry (px) ===
    pub compact_size_min: f32,
    pub compact_size_spread: f32,
    pub standard_size_min: f32,
    pub standard_size_spread: f32,
    pub compact_breakpoint: f32,
    pub top_safe_zone: f32,
    pub overlap_margin: f32,
    pub max_placement_attempts: u32,

    // === Visual decay ===
    pub min_scale: f32,
    pub ease_knee: f32,

    // === Scoring ===
    pub base_points: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            lifespan_min_ms: LIFESPAN_MIN_MS,
            lifespan_spread_ms: LIFESPAN_SPREAD_MS,
            window_min_ms: WINDOW_MIN_MS,
            window_spread_ms: WINDOW_SPREAD_MS,
            respawn_delay_ms: RESPAWN_DELAY_MS,

            compact_size_min: COMPACT_SIZE_MIN,
            compact_size_spread: COMPACT_SIZE_SPREAD,
            standard_size_min: STANDARD_SIZE_MIN,
            standard_size_spread: STANDARD_SIZE_SPREAD,
            compact_breakpoint: COMPACT_BREAKPOINT,
            top_safe_zone: TOP_SAFE_ZONE,
            overlap_margin: OVERLAP_MARGIN,
            max_placement_attempts: MAX_PLACEMENT_ATTEMPTS,

            min_scale: MIN_SCALE,
            ease_knee: EASE_KNEE,

            base_points: BASE_POINTS,
        }
    }
}

impl Tuning {
    /// Parse and validate; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let durations = [
            ("lifespan_min_ms", self.lifespan_min_ms),
            ("lifespan_spread_ms", self.lifespan_spread_ms),
            ("window_min_ms", self.window_min_ms),
            ("window_spread_ms", self.window_spread_ms),
            ("respawn_delay_ms", self.respawn_delay_ms),
        ];
        for (field, value) in durations {
            if !value.is_finite() || value < 0.0 {
                return Err(SettingsError::OutOfRange {
                    field,
                    value: value.to_string(),
                });
            }
        }
        if self.window_min_ms <= 0.0 {
            return Err(SettingsError::OutOfRange {
                field: "window_min_ms",
                value: self.window_min_ms.to_string(),
            });
        }
        // The whole window must fit inside the shortest lifespan
        if self.window_min_ms + self.window_spread_ms > self.lifespan_min_ms {
            return Err(SettingsError::WindowExceedsLifespan {
                window_ms: self.window_min_ms + self.window_spread_ms,
                lifespan_ms: self.lifespan_min_ms,
            });
        }
        let sizes = [
            ("compact_size_min", self.compact_size_min),
            ("standard_size_min", self.standard_size_min),
        ];
        for (field, value) in sizes {
            if !value.is_finite() || value <= 0.0 {
                return Err(SettingsError::OutOfRange {
                    field,
                    value: value.to_string(),
                });
            }
        }
        let lengths = [
            ("compact_size_spread", self.compact_size_spread),
            ("standard_size_spread", self.standard_size_spread),
            ("compact_breakpoint", self.compact_breakpoint),
            ("top_safe_zone", self.top_safe_zone),
            ("overlap_margin", self.overlap_margin),
        ];
        for (field, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(SettingsError::OutOfRange {
                    field,
                    value: value.to_string(),
                });
            }
        }
        if !(1..=MAX_PLACEMENT_ATTEMPTS_CAP).contains(&self.max_placement_attempts) {
            return Err(SettingsError::OutOfRange {
                field: "max_placement_attempts",
                value: self.max_placement_attempts.to_string(),
            });
        }
        if !(1..=MAX_BASE_POINTS).contains(&self.base_points) {
            return Err(SettingsError::OutOfRange {
                field: "base_points",
                value: self.base_points.to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.min_scale) {
            return Err(SettingsError::OutOfRange {
                field: "min_scale",
                value: self.min_scale.to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.ease_knee) {
            return Err(SettingsError::OutOfRange {
                field: "ease_knee",
                value: self.ease_knee.to_string(),
            });
        }
        Ok(())
    }

    /// Tuning with no gap between targets (handy for scripted play)
    pub fn instant_respawn() -> Self {
        Self {
            respawn_delay_ms: 0.0,
            ..Self::default()
        }
    }
}
