//! Game controller
//!
//! Owns the one live target, its timers, the score/combo state and the event
//! outbox. Every mutation is driven by a caller-supplied timestamp, so the
//! same seed and the same inputs always replay the same game.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::{GameEvent, MissKind};
use super::placement::{PlayArea, Rect};
use super::score::GameState;
use super::target::{Outcome, Resolution, Target, TargetPhase};
use super::tick::{PointerEvent, PointerHit, PointerKind};
use super::timer::{Fired, TimerKind, TimerQueue};
use crate::ambient::Environment;
use crate::consts::MAX_TARGETS;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start screen, nothing spawned yet
    #[default]
    Title,
    Playing,
    Paused,
}

/// What the renderer needs to draw the live target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetView {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    /// Visual scale in [min_scale, 1.0]
    pub scale: f32,
    /// Lifespan progress in [0, 1]
    pub progress: f32,
    pub green: bool,
    pub pressed: bool,
}

/// What the display shows
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub combo: u32,
    pub multiplier: u32,
    pub on_fire: bool,
    pub hits: u32,
    pub misses: u32,
    pub best_combo: u32,
    pub phase: GamePhase,
    pub environment: Environment,
    pub sound_enabled: bool,
}

pub struct Session {
    pub phase: GamePhase,
    pub game: GameState,
    pub area: PlayArea,
    pub settings: Settings,
    pub tuning: Tuning,
    seed: u64,
    rng: Pcg32,
    target: Option<Target>,
    timers: TimerQueue,
    next_id: u32,
    events: Vec<GameEvent>,
    /// Time the visual decay froze at
    paused_at: Option<f64>,
    visible: bool,
}

impl Session {
    pub fn new(seed: u64, area: PlayArea, settings: Settings, tuning: Tuning) -> Self {
        Self {
            phase: GamePhase::Title,
            game: GameState::new(),
            area,
            settings,
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            target: None,
            timers: TimerQueue::new(),
            next_id: 0,
            events: Vec::new(),
            paused_at: None,
            visible: true,
        }
    }

    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    /// Leave the title screen. The first target appears after the respawn delay.
    pub fn start(&mut self, now: f64) -> bool {
        if self.phase != GamePhase::Title {
            return false;
        }
        log::info!("Session started (seed {})", self.seed);
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::Started);
        self.schedule_respawn(now);
        true
    }

    pub fn toggle_pause(&mut self, now: f64) -> bool {
        match self.phase {
            GamePhase::Playing => self.pause(now),
            GamePhase::Paused => self.resume(now),
            GamePhase::Title => false,
        }
    }

    /// Freeze: cancel every pending timer and stop the visual decay
    pub fn pause(&mut self, now: f64) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        if let Some(target) = self.target.as_mut() {
            target.disarm(&mut self.timers);
        }
        self.timers.cancel_kind(TimerKind::Respawn);
        self.phase = GamePhase::Paused;
        self.paused_at = Some(now);
        self.events.push(GameEvent::Paused);
        log::info!("Paused at {:.0}ms", now);
        true
    }

    /// Unfreeze. The live target restarts its timing from scratch.
    pub fn resume(&mut self, now: f64) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        self.phase = GamePhase::Playing;
        self.paused_at = None;
        self.events.push(GameEvent::Resumed);
        log::info!("Resumed at {:.0}ms", now);

        match self.target.as_mut() {
            Some(target) => {
                target.respawn(
                    &self.area,
                    &[],
                    now,
                    &self.tuning,
                    &mut self.rng,
                    &mut self.timers,
                );
                self.events.push(GameEvent::Spawned {
                    target: target.id,
                    pos: target.pos,
                    size: target.size,
                });
            }
            // Paused during the gap between targets
            None => self.schedule_respawn(now),
        }
        true
    }

    fn is_live(&self, id: u32) -> bool {
        self.target
            .as_ref()
            .is_some_and(|t| t.id == id && !t.is_resolved())
    }

    /// The host hit-tests before the frame's timers run. When the target it
    /// saw is gone by the event's timestamp, test the position again.
    fn current_hit(&self, event: &PointerEvent) -> PointerHit {
        match (event.hit, event.pos) {
            (PointerHit::Target(id), Some(pos)) if !self.is_live(id) => {
                self.hit_test(pos, event.timestamp)
            }
            _ => event.hit,
        }
    }

    /// Apply one pointer event at its own timestamp
    pub fn pointer(&mut self, event: &PointerEvent) {
        if self.phase != GamePhase::Playing {
            return;
        }
        match (event.kind, self.current_hit(event)) {
            (PointerKind::Down, PointerHit::Target(id)) => {
                if let Some(target) = self.target.as_mut() {
                    if target.id == id && !target.is_resolved() {
                        target.pressed = true;
                        self.events.push(GameEvent::Pressed { target: id });
                    }
                }
            }
            (PointerKind::Down, PointerHit::Background) => {}
            (PointerKind::Up, PointerHit::Target(id)) => {
                self.click_target(id, event.timestamp, event.pos);
            }
            (PointerKind::Up, PointerHit::Background) => {
                if let Some(target) = self.target.as_mut() {
                    target.pressed = false;
                }
                self.background_miss(event.pos);
            }
        }
    }

    /// Evaluate a click on the live target. Returns None when `id` is not the
    /// live, unresolved target; nothing is mutated in that case.
    pub fn click_target(&mut self, id: u32, t: f64, at: Option<Vec2>) -> Option<Outcome> {
        let live = self.target.as_ref().filter(|_| self.is_live(id));
        let Some(target) = live else {
            log::trace!("click on stale target {} ignored", id);
            return None;
        };
        let outcome = target.evaluate(t);
        self.resolve_target(outcome.into(), t, at);
        Some(outcome)
    }

    /// Click on empty play area: combo reset, target untouched
    pub fn background_miss(&mut self, at: Option<Vec2>) {
        self.events.push(GameEvent::Miss {
            target: None,
            kind: MissKind::Background,
            at,
        });
        self.game.on_miss(&mut self.events);
    }

    /// Resolve the live target and report to the score state. The first
    /// resolution wins; later calls return false and change nothing.
    fn resolve_target(&mut self, resolution: Resolution, now: f64, at: Option<Vec2>) -> bool {
        let Some(target) = self.target.as_mut() else {
            return false;
        };
        if !target.resolve(resolution, &mut self.timers) {
            return false;
        }
        let id = target.id;

        match resolution {
            Resolution::Hit => {
                let mut follow_up = Vec::new();
                let hit = self.game.on_hit(self.tuning.base_points, &mut follow_up);
                self.events.push(GameEvent::Hit {
                    target: id,
                    points: hit.points_added,
                    multiplier: hit.multiplier,
                    combo: self.game.combo,
                });
                self.events.extend(follow_up);
            }
            Resolution::TooEarly | Resolution::TooLate | Resolution::TimedOut => {
                let kind = match resolution {
                    Resolution::TooEarly => MissKind::TooEarly,
                    Resolution::TooLate => MissKind::TooLate,
                    _ => MissKind::TimedOut,
                };
                self.events.push(GameEvent::Miss {
                    target: Some(id),
                    kind,
                    at,
                });
                self.game.on_miss(&mut self.events);
            }
        }

        log::debug!("target {} resolved as {:?} at {:.0}ms", id, resolution, now);
        self.events.push(GameEvent::Resolved { target: id });
        self.target = None;
        self.schedule_respawn(now);
        true
    }

    fn schedule_respawn(&mut self, now: f64) {
        self.timers.cancel_kind(TimerKind::Respawn);
        self.timers
            .schedule(now + self.tuning.respawn_delay_ms, TimerKind::Respawn);
    }

    fn spawn_target(&mut self, now: f64) {
        let existing: Vec<Rect> = self.target.iter().map(|t| t.rect()).collect();
        if existing.len() >= MAX_TARGETS {
            return;
        }
        self.next_id += 1;
        let mut target = Target::spawn(
            self.next_id,
            &self.area,
            &existing,
            now,
            &self.tuning,
            &mut self.rng,
        );
        target.arm(&mut self.timers);
        self.events.push(GameEvent::Spawned {
            target: target.id,
            pos: target.pos,
            size: target.size,
        });
        self.target = Some(target);
    }

    /// Run one fired timer. Every target timer re-checks the live target and
    /// its token before touching anything.
    pub fn fire(&mut self, fired: Fired) {
        match fired.kind {
            TimerKind::WindowOpen { target: id } => match self.target.as_mut() {
                Some(target) if target.id == id => {
                    if target.open_window(fired.id, &mut self.timers) {
                        self.events.push(GameEvent::WindowOpened { target: id });
                    }
                }
                _ => log::trace!("stale window-open for target {}", id),
            },
            TimerKind::WindowClose { target: id } => match self.target.as_mut() {
                Some(target) if target.id == id => {
                    if target.close_window(fired.id) {
                        self.events.push(GameEvent::WindowClosed { target: id });
                    }
                }
                _ => log::trace!("stale window-close for target {}", id),
            },
            TimerKind::Expiry { target: id } => {
                let owned = self
                    .target
                    .as_ref()
                    .is_some_and(|t| t.id == id && t.owns_expiry(fired.id));
                if owned {
                    self.resolve_target(Resolution::TimedOut, fired.due, None);
                } else {
                    log::trace!("stale expiry for target {}", id);
                }
            }
            TimerKind::Respawn => {
                if self.phase == GamePhase::Playing && self.target.is_none() {
                    self.spawn_target(fired.due);
                }
            }
        }
    }

    /// Fire every timer due at or before `now`
    pub fn fire_due(&mut self, now: f64) {
        while let Some(fired) = self.timers.pop_due(now) {
            self.fire(fired);
        }
    }

    /// Fire every timer due strictly before `t`
    pub fn fire_before(&mut self, t: f64) {
        while let Some(fired) = self.timers.pop_before(t) {
            self.fire(fired);
        }
    }

    /// Clock used for visuals; frozen while paused
    fn visual_now(&self, now: f64) -> f64 {
        self.paused_at.unwrap_or(now)
    }

    pub fn target_view(&self, now: f64) -> Option<TargetView> {
        let now = self.visual_now(now);
        self.target.as_ref().map(|t| {
            let progress = t.elapsed_fraction(now);
            TargetView {
                id: t.id,
                pos: t.pos,
                size: t.size,
                scale: t.scale_at(now, &self.tuning),
                progress,
                green: t.phase == TargetPhase::Active,
                pressed: t.pressed,
            }
        })
    }

    /// Which thing a point in the play area lands on
    pub fn hit_test(&self, point: Vec2, now: f64) -> PointerHit {
        let now = self.visual_now(now);
        match &self.target {
            Some(t)
                if !t.is_resolved() && t.scaled_rect(now, &self.tuning).contains(point) =>
            {
                PointerHit::Target(t.id)
            }
            _ => PointerHit::Background,
        }
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.game.score,
            combo: self.game.combo,
            multiplier: self.game.multiplier(),
            on_fire: self.game.on_fire,
            hits: self.game.hits,
            misses: self.game.misses,
            best_combo: self.game.best_combo,
            phase: self.phase,
            environment: self.settings.environment,
            sound_enabled: self.settings.sound_enabled,
        }
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn set_environment(&mut self, environment: Environment) -> bool {
        let from = self.settings.environment;
        if from == environment {
            return false;
        }
        self.settings.environment = environment;
        self.events.push(GameEvent::EnvironmentChanged {
            from,
            to: environment,
        });
        log::info!("Environment: {} -> {}", from.as_str(), environment.as_str());
        true
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.settings.sound_enabled = !self.settings.sound_enabled;
        let enabled = self.settings.sound_enabled;
        self.events.push(GameEvent::SoundToggled { enabled });
        enabled
    }

    /// Page visibility. Only the media reacts; the game keeps running.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible == visible {
            return;
        }
        self.visible = visible;
        self.events.push(GameEvent::VisibilityChanged { visible });
    }

    /// New play area bounds, used from the next placement on
    pub fn resize(&mut self, area: PlayArea) {
        self.area = area;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::placement::ViewportClass;

    fn session() -> Session {
        Session::new(
            1234,
            PlayArea::new(1280.0, 800.0, ViewportClass::Standard),
            Settings::default(),
            Tuning::default(),
        )
    }

    /// Start at 0 and run until the first target is live
    fn started() -> Session {
        let mut s = session();
        s.start(0.0);
        s.fire_due(150.0);
        s
    }

    #[test]
    fn test_first_spawn_after_delay() {
        let mut s = session();
        assert!(s.start(0.0));
        assert!(!s.start(5.0));
        s.fire_due(149.0);
        assert!(s.target().is_none());
        s.fire_due(150.0);
        let t = s.target().unwrap();
        assert_eq!(t.spawn_time, 150.0);
        assert_eq!(t.phase, TargetPhase::Spawned);
    }

    #[test]
    fn test_hit_then_forced_expiry_counts_once() {
        let mut s = started();
        let t = s.target().unwrap().clone();
        let expiry = t.timers().expiry.unwrap();

        assert_eq!(
            s.click_target(t.id, t.window_start + 1.0, None),
            Some(Outcome::Hit)
        );
        assert_eq!(s.game.score, 1);
        assert_eq!(s.game.combo, 1);

        // Expiry token was cancelled; a forced fire is a no-op
        s.fire(Fired {
            id: expiry,
            due: t.expires_at(),
            kind: TimerKind::Expiry { target: t.id },
        });
        assert_eq!(s.game.score, 1);
        assert_eq!(s.game.combo, 1);
        assert_eq!(s.game.misses, 0);
        // Second click on the resolved target is refused
        assert_eq!(s.click_target(t.id, t.window_start + 2.0, None), None);
    }

    #[test]
    fn test_expiry_misses_and_respawns() {
        let mut s = started();
        s.game.combo = 3;
        let t = s.target().unwrap().clone();
        s.drain_events();

        s.fire_due(t.expires_at());
        assert!(s.target().is_none());
        assert_eq!(s.game.combo, 0);
        let events = s.drain_events();
        assert!(events.contains(&GameEvent::Miss {
            target: Some(t.id),
            kind: MissKind::TimedOut,
            at: None
        }));
        assert!(events.contains(&GameEvent::ComboLost { lost: 3 }));

        s.fire_due(t.expires_at() + 150.0);
        let next = s.target().unwrap();
        assert_ne!(next.id, t.id);
        assert_eq!(next.spawn_time, t.expires_at() + 150.0);
    }

    #[test]
    fn test_early_click_resolves_as_miss() {
        let mut s = started();
        let t = s.target().unwrap().clone();
        let early = t.window_start - 1.0;
        if early >= t.spawn_time {
            assert_eq!(s.click_target(t.id, early, None), Some(Outcome::TooEarly));
            assert!(s.target().is_none());
            assert_eq!(s.game.misses, 1);
        }
    }

    #[test]
    fn test_background_miss_keeps_target() {
        let mut s = started();
        s.game.combo = 6;
        s.game.on_fire = true;
        let id = s.target().unwrap().id;
        s.background_miss(Some(Vec2::new(1.0, 1.0)));
        assert_eq!(s.game.combo, 0);
        assert!(!s.game.on_fire);
        assert_eq!(s.target().unwrap().id, id);
        assert!(!s.target().unwrap().is_resolved());
    }

    #[test]
    fn test_pause_cancels_and_resume_respawns() {
        let mut s = started();
        let before = s.target().unwrap().clone();

        assert!(s.toggle_pause(500.0));
        assert!(s.timers().is_empty());
        // Nothing fires while paused, however long
        s.fire_due(1_000_000.0);
        assert_eq!(s.target().unwrap().id, before.id);
        assert_eq!(s.game.misses, 0);

        assert!(s.toggle_pause(60_000.0));
        let after = s.target().unwrap();
        assert_eq!(after.id, before.id);
        assert_eq!(after.spawn_time, 60_000.0);
        assert_eq!(after.lifespan, before.lifespan);
        assert_eq!(after.phase, TargetPhase::Spawned);
        assert_eq!(s.timers().len(), 2);
    }

    #[test]
    fn test_pause_during_gap_spawns_on_resume() {
        let mut s = started();
        let t = s.target().unwrap().clone();
        s.click_target(t.id, t.window_start, None);
        assert!(s.target().is_none());

        s.pause(t.window_start + 10.0);
        s.fire_due(t.window_start + 10_000.0);
        assert!(s.target().is_none());

        s.resume(20_000.0);
        s.fire_due(20_150.0);
        assert!(s.target().is_some());
    }

    #[test]
    fn test_input_ignored_when_not_playing() {
        let mut s = session();
        s.pointer(&PointerEvent::up(10.0, PointerHit::Background));
        assert_eq!(s.game.misses, 0);

        let mut s = started();
        s.pause(200.0);
        s.pointer(&PointerEvent::up(210.0, PointerHit::Background));
        assert_eq!(s.game.misses, 0);
    }

    #[test]
    fn test_view_freezes_while_paused() {
        let mut s = started();
        let t = s.target().unwrap().clone();
        let mid = t.spawn_time + t.lifespan / 2.0;
        s.pause(mid);
        let view = s.target_view(mid + 100_000.0).unwrap();
        assert!((view.progress - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_hit_test_uses_scaled_bounds() {
        let s = started();
        let t = s.target().unwrap();
        let center = t.pos + Vec2::splat(t.size / 2.0);
        assert_eq!(s.hit_test(center, t.spawn_time), PointerHit::Target(t.id));
        // Corner is outside once the target has shrunk
        assert_eq!(s.hit_test(t.pos, t.expires_at()), PointerHit::Background);
    }

    #[test]
    fn test_environment_and_sound() {
        let mut s = session();
        assert!(!s.set_environment(Environment::Jungle));
        assert!(s.set_environment(Environment::Arctic));
        assert!(!s.toggle_sound());
        s.set_visible(false);
        s.set_visible(false);
        let events = s.drain_events();
        assert_eq!(
            events,
            vec![
                GameEvent::EnvironmentChanged {
                    from: Environment::Jungle,
                    to: Environment::Arctic
                },
                GameEvent::SoundToggled { enabled: false },
                GameEvent::VisibilityChanged { visible: false },
            ]
        );
        assert_eq!(s.hud().environment, Environment::Arctic);
    }
}
