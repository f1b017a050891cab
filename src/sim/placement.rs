//! Target sizing and placement inside the play area

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Device class that picks the target size range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewportClass {
    /// Phones and narrow windows
    Compact,
    #[default]
    Standard,
}

impl ViewportClass {
    pub fn from_viewport_width(width: f32, tuning: &Tuning) -> Self {
        if width <= tuning.compact_breakpoint {
            ViewportClass::Compact
        } else {
            ViewportClass::Standard
        }
    }

    /// (min, spread) of the target size for this class
    pub fn size_range(&self, tuning: &Tuning) -> (f32, f32) {
        match self {
            ViewportClass::Compact => (tuning.compact_size_min, tuning.compact_size_spread),
            ViewportClass::Standard => (tuning.standard_size_min, tuning.standard_size_spread),
        }
    }
}

/// Bounds of the play area plus the device class
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayArea {
    pub width: f32,
    pub height: f32,
    pub class: ViewportClass,
}

impl PlayArea {
    pub fn new(width: f32, height: f32, class: ViewportClass) -> Self {
        Self {
            width,
            height,
            class,
        }
    }
}

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    /// Square of side `size` at top-left `pos`
    pub fn square(pos: Vec2, size: f32) -> Self {
        Self {
            left: pos.x,
            top: pos.y,
            right: pos.x + size,
            bottom: pos.y + size,
        }
    }

    pub fn expand(&self, margin: f32) -> Self {
        Self {
            left: self.left - margin,
            top: self.top - margin,
            right: self.right + margin,
            bottom: self.bottom + margin,
        }
    }

    /// Touching edges count as overlapping
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.right < other.left
            || self.left > other.right
            || self.bottom < other.top
            || self.top > other.bottom)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }
}

/// Draw a target size for the area's device class
pub fn draw_size<R: Rng>(area: &PlayArea, tuning: &Tuning, rng: &mut R) -> f32 {
    let (min, spread) = area.class.size_range(tuning);
    min + rng.random::<f32>() * spread
}

/// One uniform candidate in `[0, W - size] x [top, H - size]`.
/// Degenerate spans (area smaller than the target) collapse to their lower bound.
fn candidate<R: Rng>(area: &PlayArea, size: f32, tuning: &Tuning, rng: &mut R) -> Vec2 {
    let span_x = (area.width - size).max(0.0);
    let span_y = (area.height - size - tuning.top_safe_zone).max(0.0);
    Vec2::new(
        rng.random::<f32>() * span_x,
        tuning.top_safe_zone + rng.random::<f32>() * span_y,
    )
}

/// Whether a candidate collides with the top band or any existing target
fn blocked(pos: Vec2, size: f32, existing: &[Rect], tuning: &Tuning) -> bool {
    let margin = tuning.overlap_margin;
    let this = Rect::square(pos, size).expand(margin);
    if this.top < tuning.top_safe_zone {
        return true;
    }
    existing
        .iter()
        .any(|other| this.overlaps(&other.expand(margin)))
}

/// Pick a position for a target of `size`.
///
/// Tries up to `max_placement_attempts` candidates; when every one collides,
/// the last candidate is used anyway. Non-overlap is best effort.
pub fn place<R: Rng>(
    area: &PlayArea,
    size: f32,
    existing: &[Rect],
    tuning: &Tuning,
    rng: &mut R,
) -> Vec2 {
    let attempts = tuning.max_placement_attempts.max(1);
    let mut pos = candidate(area, size, tuning, rng);
    for attempt in 1..attempts {
        if !blocked(pos, size, existing, tuning) {
            return pos;
        }
        log::trace!("placement attempt {} blocked at {:?}", attempt, pos);
        pos = candidate(area, size, tuning, rng);
    }
    if blocked(pos, size, existing, tuning) {
        log::debug!("placement gave up after {} attempts, accepting overlap", attempts);
    }
    pos
}
