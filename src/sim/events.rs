//! Notifications emitted by the game core
//!
//! Collaborators (display, audio/video) drain these from the session after
//! each tick. Nothing in the core waits on them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::ambient::Environment;

/// Why a miss happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissKind {
    /// Clicked the target before it turned green
    TooEarly,
    /// Clicked the target after the green window
    TooLate,
    /// Target expired without a click
    TimedOut,
    /// Clicked empty play area
    Background,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    Spawned {
        target: u32,
        pos: Vec2,
        size: f32,
    },
    WindowOpened {
        target: u32,
    },
    WindowClosed {
        target: u32,
    },
    Pressed {
        target: u32,
    },
    Hit {
        target: u32,
        points: u64,
        multiplier: u32,
        combo: u32,
    },
    Miss {
        /// None for background clicks
        target: Option<u32>,
        kind: MissKind,
        /// Click position, when the miss came from a pointer
        at: Option<Vec2>,
    },
    /// Combo reached 2 or more
    Combo {
        combo: u32,
    },
    ComboLost {
        lost: u32,
    },
    OnFire {
        active: bool,
    },
    Resolved {
        target: u32,
    },
    EnvironmentChanged {
        from: Environment,
        to: Environment,
    },
    SoundToggled {
        enabled: bool,
    },
    VisibilityChanged {
        visible: bool,
    },
}

impl GameEvent {
    /// Floating text for the display, if this event shows one
    pub fn caption(&self) -> Option<String> {
        match self {
            GameEvent::Hit {
                points, multiplier, ..
            } => Some(format!("+{} (x{})", points, multiplier)),
            GameEvent::Combo { combo } => Some(format!("Combo x{}!", combo)),
            GameEvent::ComboLost { .. } => Some("Combo Lost!".to_string()),
            GameEvent::Miss { kind, .. } => Some(
                match kind {
                    MissKind::TooEarly => "Too Early",
                    MissKind::TooLate => "Too Late",
                    MissKind::TimedOut => "Missed",
                    MissKind::Background => "Miss!",
                }
                .to_string(),
            ),
            _ => None,
        }
    }

    /// Combo captions get their own styling
    pub fn is_combo_caption(&self) -> bool {
        matches!(self, GameEvent::Combo { .. } | GameEvent::ComboLost { .. })
    }
}
