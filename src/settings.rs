//! Game settings and preferences
//!
//! Handed in by the page as JSON; nothing is persisted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ambient::Environment;

/// Errors from loading settings or tuning
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: String },
    #[error("green window of {window_ms}ms does not fit a {lifespan_ms}ms lifespan")]
    WindowExceedsLifespan { window_ms: f64, lifespan_ms: f64 },
    #[error("unknown environment: {0}")]
    UnknownEnvironment(String),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ambient theme (video, music, effect sounds)
    pub environment: Environment,

    // === Audio ===
    /// All sound on/off (the sound button)
    pub sound_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment: Environment::Jungle,
            sound_enabled: true,
            master_volume: 1.0,
            sfx_volume: 1.0,
            music_volume: 1.0,
        }
    }
}

impl Settings {
    /// Parse and validate; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        log::info!("Loaded settings ({})", settings.environment.as_str());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let volumes = [
            ("master_volume", self.master_volume),
            ("sfx_volume", self.sfx_volume),
            ("music_volume", self.music_volume),
        ];
        for (field, value) in volumes {
            if !(0.0..=1.0).contains(&value) {
                return Err(SettingsError::OutOfRange {
                    field,
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Volume to play an effect at, given its base level
    pub fn effect_volume(&self, base: f32) -> f32 {
        if !self.sound_enabled {
            return 0.0;
        }
        (base * self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
    }

    pub fn effective_music_volume(&self) -> f32 {
        if !self.sound_enabled {
            return 0.0;
        }
        (self.master_volume * self.music_volume).clamp(0.0, 1.0)
    }
}
