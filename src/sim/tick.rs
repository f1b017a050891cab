//! Frame-driven advance
//!
//! The host calls [`tick`] once per frame with the pointer events gathered
//! since the last frame. Events carry their own timestamps; timers and
//! clicks are interleaved in time order so a late frame never changes who
//! wins the click-vs-expiry race.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerKind {
    /// Mouse down / touch start
    Down,
    /// Click / touch end; this is what gets evaluated
    Up,
}

/// Hit-test result supplied with each pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerHit {
    Target(u32),
    Background,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    /// Absolute time of the event (ms)
    pub timestamp: f64,
    /// Play-area position, when known
    pub pos: Option<Vec2>,
    pub hit: PointerHit,
}

impl PointerEvent {
    pub fn down(timestamp: f64, hit: PointerHit) -> Self {
        Self {
            kind: PointerKind::Down,
            timestamp,
            pos: None,
            hit,
        }
    }

    pub fn up(timestamp: f64, hit: PointerHit) -> Self {
        Self {
            kind: PointerKind::Up,
            timestamp,
            pos: None,
            hit,
        }
    }

    pub fn at(mut self, pos: Vec2) -> Self {
        self.pos = Some(pos);
        self
    }
}

/// Input gathered for one frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub pointer: Vec<PointerEvent>,
    /// Pause toggle, applied at the end of the frame
    pub pause: bool,
}

/// Advance the session to `now`
pub fn tick(session: &mut Session, input: &TickInput, now: f64) {
    let mut pointer = input.pointer.clone();
    pointer.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

    for event in &pointer {
        // Timers due strictly before the click go first; on a tie the click wins
        session.fire_before(event.timestamp);
        session.pointer(event);
    }
    session.fire_due(now);

    if input.pause {
        session.toggle_pause(now);
    }
}
