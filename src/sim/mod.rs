//! Deterministic game core
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestamps only (ms)
//! - Seeded RNG only
//! - Timers are data, cancelled by token
//! - No rendering or platform dependencies

pub mod events;
pub mod placement;
pub mod score;
pub mod session;
pub mod target;
pub mod tick;
pub mod timer;

pub use events::{GameEvent, MissKind};
pub use placement::{PlayArea, Rect, ViewportClass, place};
pub use score::{GameState, HitScore, multiplier};
pub use session::{GamePhase, Hud, Session, TargetView};
pub use target::{Outcome, Resolution, Target, TargetPhase, decay_scale};
pub use tick::{PointerEvent, PointerHit, PointerKind, TickInput, tick};
pub use timer::{TimerId, TimerKind, TimerQueue};
