//! Sound effect cues
//!
//! Maps game events to the effect that should play and the file it plays
//! from. Playback itself belongs to the page.

use serde::Serialize;

use crate::ambient::Environment;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SoundEffect {
    /// Target appears
    Pop,
    /// Target hit inside the green window
    Hit,
    /// Any miss: early, late, expired, background
    Miss,
}

impl SoundEffect {
    /// Effect triggered by an event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Spawned { .. } => Some(SoundEffect::Pop),
            GameEvent::Hit { .. } => Some(SoundEffect::Hit),
            GameEvent::Miss { .. } => Some(SoundEffect::Miss),
            _ => None,
        }
    }

    /// Asset path; pop and hit change with the environment
    pub fn asset(&self, environment: Environment) -> &'static str {
        match (self, environment) {
            (SoundEffect::Pop, Environment::Jungle) => "assets/pop.mp3",
            (SoundEffect::Pop, Environment::Arctic) => "assets/arctic_pop.mp3",
            (SoundEffect::Hit, Environment::Jungle) => "assets/hit.mp3",
            (SoundEffect::Hit, Environment::Arctic) => "assets/arctic_hit.mp3",
            (SoundEffect::Miss, _) => "assets/miss.m4a",
        }
    }

    /// Volume before the player's settings apply
    pub fn base_volume(&self) -> f32 {
        match self {
            SoundEffect::Pop => 0.6,
            SoundEffect::Hit | SoundEffect::Miss => 0.4,
        }
    }
}
