//! Reflex Pop - pop the target while it glows green
//!
//! Core modules:
//! - `sim`: Deterministic game core (target lifecycle, timers, score/combo)
//! - `ambient`: Jungle/Arctic environments, background music and video
//! - `audio`: Sound effect cues
//! - `settings`: Player preferences
//! - `tuning`: Data-driven game balance
//! - `web`: Browser binding (wasm32 only)

pub mod ambient;
pub mod audio;
pub mod settings;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use ambient::{Environment, MediaCommand, MediaDirector};
pub use settings::{Settings, SettingsError};
pub use tuning::Tuning;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Target lifespan range (ms): 2.0-3.0 seconds
    pub const LIFESPAN_MIN_MS: f64 = 2000.0;
    pub const LIFESPAN_SPREAD_MS: f64 = 1000.0;

    /// Green window duration range (ms): 0.8-1.3 seconds
    pub const WINDOW_MIN_MS: f64 = 800.0;
    pub const WINDOW_SPREAD_MS: f64 = 500.0;

    /// Target size on compact viewports (px): 70-100
    pub const COMPACT_SIZE_MIN: f32 = 70.0;
    pub const COMPACT_SIZE_SPREAD: f32 = 30.0;
    /// Target size on standard viewports (px): 200-280
    pub const STANDARD_SIZE_MIN: f32 = 200.0;
    pub const STANDARD_SIZE_SPREAD: f32 = 80.0;
    /// Viewports this wide or narrower count as compact
    pub const COMPACT_BREAKPOINT: f32 = 768.0;

    /// Reserved band at the top of the play area (progress bar + menu)
    pub const TOP_SAFE_ZONE: f32 = 100.0;
    /// Minimum spacing between targets
    pub const OVERLAP_MARGIN: f32 = 20.0;
    /// Placement attempts before overlap is accepted
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 20;

    /// Delay between a resolution and the next spawn (ms)
    pub const RESPAWN_DELAY_MS: f64 = 150.0;
    /// Live targets at once
    pub const MAX_TARGETS: usize = 1;

    /// Targets shrink to 70% of their spawn size
    pub const MIN_SCALE: f32 = 0.7;
    /// Progress below this point shrinks at a damped rate
    pub const EASE_KNEE: f32 = 0.7;

    /// Points for one hit before the multiplier
    pub const BASE_POINTS: u64 = 1;
}
