//! Target lifecycle
//!
//! A target lives for `lifespan` ms. Somewhere inside that lifespan it turns
//! green for `window_duration` ms; a click inside the green window is a hit.
//! The target resolves exactly once, by click or by expiry, and resolving
//! cancels every timer it still has pending.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::placement::{self, PlayArea, Rect};
use super::timer::{TimerId, TimerKind, TimerQueue};
use crate::consts::{EASE_KNEE, MIN_SCALE};
use crate::tuning::Tuning;

/// Result of evaluating a click against the green window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Hit,
    TooEarly,
    TooLate,
}

/// How a target left play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    Hit,
    TooEarly,
    TooLate,
    /// Lifespan ran out without a click
    TimedOut,
}

impl From<Outcome> for Resolution {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Hit => Resolution::Hit,
            Outcome::TooEarly => Resolution::TooEarly,
            Outcome::TooLate => Resolution::TooLate,
        }
    }
}

impl Resolution {
    pub fn is_hit(&self) -> bool {
        matches!(self, Resolution::Hit)
    }
}

/// Target lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetPhase {
    /// Waiting for the green window
    Spawned,
    /// Inside the green window
    Active,
    /// Past the green window, still on screen
    Expired,
    /// Hit or missed; terminal
    Resolved(Resolution),
}

/// Pending timer tokens of one target
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetTimers {
    pub window_open: Option<TimerId>,
    pub window_close: Option<TimerId>,
    pub expiry: Option<TimerId>,
}

/// The clickable target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub id: u32,
    /// Top-left corner in play-area pixels
    pub pos: Vec2,
    pub size: f32,
    pub spawn_time: f64,
    pub lifespan: f64,
    pub window_duration: f64,
    pub window_start: f64,
    pub window_end: f64,
    pub phase: TargetPhase,
    /// Pointer is down on the target (visual only)
    #[serde(default)]
    pub pressed: bool,
    #[serde(skip)]
    timers: TargetTimers,
}

impl Target {
    /// Build a target with explicit timing. `window_offset` is the delay from
    /// spawn to the window opening and is clamped so the window ends inside
    /// the lifespan.
    pub fn with_timing(
        id: u32,
        pos: Vec2,
        size: f32,
        spawn_time: f64,
        lifespan: f64,
        window_duration: f64,
        window_offset: f64,
    ) -> Self {
        let mut target = Self {
            id,
            pos,
            size,
            spawn_time,
            lifespan,
            window_duration,
            window_start: spawn_time,
            window_end: spawn_time + window_duration,
            phase: TargetPhase::Spawned,
            pressed: false,
            timers: TargetTimers::default(),
        };
        target.set_window(spawn_time, window_offset);
        target
    }

    /// Draw size, position, lifespan and green window for a fresh target
    pub fn spawn<R: Rng>(
        id: u32,
        area: &PlayArea,
        existing: &[Rect],
        now: f64,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Self {
        let size = placement::draw_size(area, tuning, rng);
        let pos = placement::place(area, size, existing, tuning, rng);
        let lifespan = tuning.lifespan_min_ms + rng.random::<f64>() * tuning.lifespan_spread_ms;
        let window_duration = tuning.window_min_ms + rng.random::<f64>() * tuning.window_spread_ms;
        let offset = rng.random::<f64>() * max_window_offset(lifespan, window_duration);

        log::debug!(
            "target {} spawned: size {:.0}, lifespan {:.0}ms, window +{:.0}..+{:.0}ms",
            id,
            size,
            lifespan,
            offset,
            offset + window_duration
        );

        Self::with_timing(id, pos, size, now, lifespan, window_duration, offset)
    }

    /// Restart timing from scratch at `now`: new position and window, same
    /// size, lifespan and window duration. Pending timers are cancelled.
    pub fn respawn<R: Rng>(
        &mut self,
        area: &PlayArea,
        existing: &[Rect],
        now: f64,
        tuning: &Tuning,
        rng: &mut R,
        timers: &mut TimerQueue,
    ) {
        self.disarm(timers);
        self.pos = placement::place(area, self.size, existing, tuning, rng);
        let offset = rng.random::<f64>() * max_window_offset(self.lifespan, self.window_duration);
        self.set_window(now, offset);
        self.phase = TargetPhase::Spawned;
        self.pressed = false;
        self.arm(timers);
    }

    fn set_window(&mut self, spawn_time: f64, offset: f64) {
        let offset = offset.clamp(0.0, max_window_offset(self.lifespan, self.window_duration));
        self.spawn_time = spawn_time;
        self.window_start = spawn_time + offset;
        self.window_end = self.window_start + self.window_duration;
    }

    /// Schedule window-open and expiry
    pub fn arm(&mut self, timers: &mut TimerQueue) {
        self.timers.window_open =
            Some(timers.schedule(self.window_start, TimerKind::WindowOpen { target: self.id }));
        self.timers.expiry =
            Some(timers.schedule(self.expires_at(), TimerKind::Expiry { target: self.id }));
    }

    /// Cancel every pending timer of this target
    pub fn disarm(&mut self, timers: &mut TimerQueue) {
        for id in [
            self.timers.window_open.take(),
            self.timers.window_close.take(),
            self.timers.expiry.take(),
        ]
        .into_iter()
        .flatten()
        {
            timers.cancel(id);
        }
    }

    pub fn timers(&self) -> TargetTimers {
        self.timers
    }

    pub fn expires_at(&self) -> f64 {
        self.spawn_time + self.lifespan
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.phase, TargetPhase::Resolved(_))
    }

    /// Green window is open
    pub fn is_green(&self) -> bool {
        self.phase == TargetPhase::Active
    }

    /// Classify a click by its timestamp. Pure: uses only the scheduled
    /// window bounds, never the visual phase.
    pub fn evaluate(&self, t: f64) -> Outcome {
        if t < self.window_start {
            Outcome::TooEarly
        } else if t <= self.window_end {
            Outcome::Hit
        } else {
            Outcome::TooLate
        }
    }

    /// Window-open timer fired. Returns false for a stale token.
    pub fn open_window(&mut self, id: TimerId, timers: &mut TimerQueue) -> bool {
        if self.timers.window_open != Some(id) || self.phase != TargetPhase::Spawned {
            return false;
        }
        self.timers.window_open = None;
        self.phase = TargetPhase::Active;
        self.timers.window_close =
            Some(timers.schedule(self.window_end, TimerKind::WindowClose { target: self.id }));
        true
    }

    /// Window-close timer fired. Returns false for a stale token.
    pub fn close_window(&mut self, id: TimerId) -> bool {
        if self.timers.window_close != Some(id) || self.phase != TargetPhase::Active {
            return false;
        }
        self.timers.window_close = None;
        self.phase = TargetPhase::Expired;
        true
    }

    /// Whether an expiry timer with this token may still resolve the target
    pub fn owns_expiry(&self, id: TimerId) -> bool {
        self.timers.expiry == Some(id) && !self.is_resolved()
    }

    /// Resolve once. Cancels all pending timers; a second call is a no-op
    /// returning false.
    pub fn resolve(&mut self, resolution: Resolution, timers: &mut TimerQueue) -> bool {
        if self.is_resolved() {
            return false;
        }
        self.disarm(timers);
        self.phase = TargetPhase::Resolved(resolution);
        self.pressed = false;
        true
    }

    /// Fraction of the lifespan elapsed at `now`, in [0, 1]
    pub fn elapsed_fraction(&self, now: f64) -> f32 {
        if self.lifespan <= 0.0 {
            return 1.0;
        }
        ((now - self.spawn_time) / self.lifespan).clamp(0.0, 1.0) as f32
    }

    /// Unscaled bounds
    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, self.size)
    }

    /// Visual scale at `now` on the tuned decay curve
    pub fn scale_at(&self, now: f64, tuning: &Tuning) -> f32 {
        eased_scale(self.elapsed_fraction(now), tuning.min_scale, tuning.ease_knee)
    }

    /// Bounds after the decay scale at `now`, shrinking about the center
    pub fn scaled_rect(&self, now: f64, tuning: &Tuning) -> Rect {
        let scale = self.scale_at(now, tuning);
        let inset = self.size * (1.0 - scale) / 2.0;
        self.rect().expand(-inset)
    }
}

/// Longest allowed delay from spawn to window open
fn max_window_offset(lifespan: f64, window_duration: f64) -> f64 {
    (lifespan - window_duration).max(0.0)
}

/// Visual scale for a given lifespan progress, from 1.0 down to 0.7.
///
/// Progress below the knee is damped by the knee factor, so the target
/// shrinks slowly at first and then jumps onto the linear ramp.
pub fn decay_scale(progress: f32) -> f32 {
    eased_scale(progress, MIN_SCALE, EASE_KNEE)
}

/// [`decay_scale`] with explicit floor and knee
pub fn eased_scale(progress: f32, min_scale: f32, knee: f32) -> f32 {
    let p = progress.clamp(0.0, 1.0);
    let eased = if p < knee { p * knee } else { p };
    (1.0 - (1.0 - min_scale) * eased).max(min_scale)
}
