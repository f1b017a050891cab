//! Score and combo bookkeeping
//!
//! Single source of truth for score and combo. It does not deduplicate:
//! the target lifecycle guarantees one report per target.

use serde::{Deserialize, Serialize};

use super::events::GameEvent;

/// Combo needed for the sustained on-fire state
pub const ON_FIRE_COMBO: u32 = 5;
/// Combo needed before combo captions show
pub const COMBO_CAPTION_MIN: u32 = 2;

/// Score multiplier for a combo value (pre-increment)
pub fn multiplier(combo: u32) -> u32 {
    match combo {
        15.. => 4,
        10.. => 3,
        5.. => 2,
        _ => 1,
    }
}

/// Points awarded by one hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitScore {
    pub points_added: u64,
    pub multiplier: u32,
}

/// Score, combo and run statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub score: u64,
    pub combo: u32,
    /// Combo glow is showing
    pub on_fire: bool,
    pub hits: u32,
    pub misses: u32,
    pub best_combo: u32,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Multiplier the next hit will earn
    pub fn multiplier(&self) -> u32 {
        multiplier(self.combo)
    }

    /// Score a hit. The multiplier uses the combo before this hit counts.
    pub fn on_hit(&mut self, base_points: u64, events: &mut Vec<GameEvent>) -> HitScore {
        let multiplier = self.multiplier();
        let points_added = base_points.saturating_mul(multiplier as u64);
        self.score = self.score.saturating_add(points_added);
        self.combo += 1;
        self.hits += 1;
        self.best_combo = self.best_combo.max(self.combo);

        if self.combo >= COMBO_CAPTION_MIN {
            events.push(GameEvent::Combo { combo: self.combo });
        }
        if self.combo >= ON_FIRE_COMBO && !self.on_fire {
            self.on_fire = true;
            events.push(GameEvent::OnFire { active: true });
        }

        HitScore {
            points_added,
            multiplier,
        }
    }

    /// Any miss: early, late, expired or background. Score is untouched.
    /// Returns the combo that was lost (0 if there was none).
    pub fn on_miss(&mut self, events: &mut Vec<GameEvent>) -> u32 {
        let lost = self.combo;
        self.misses += 1;
        if lost > 0 {
            events.push(GameEvent::ComboLost { lost });
        }
        if self.on_fire {
            self.on_fire = false;
            events.push(GameEvent::OnFire { active: false });
        }
        self.combo = 0;
        lost
    }
}
