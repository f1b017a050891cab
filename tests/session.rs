// Integration tests for the reflex-pop game core.
// These drive a full session through `tick` the way a page would and check
// the timing and scoring rules end to end. No wasm needed.

use glam::Vec2;
use proptest::prelude::*;

use reflex_pop::sim::{
    GameEvent, GamePhase, MissKind, PlayArea, PointerEvent, PointerHit, Session, Target,
    TickInput, ViewportClass, multiplier, tick,
};
use reflex_pop::{MediaCommand, MediaDirector, Settings, Tuning};

fn session(seed: u64) -> Session {
    Session::new(
        seed,
        PlayArea::new(1280.0, 800.0, ViewportClass::Standard),
        Settings::default(),
        Tuning::instant_respawn(),
    )
}

fn click(target: &Target, at: f64) -> TickInput {
    TickInput {
        pointer: vec![PointerEvent::up(at, PointerHit::Target(target.id))],
        pause: false,
    }
}

#[test]
fn fifteen_hits_climb_the_ladder() {
    let mut s = session(10);
    s.start(0.0);
    tick(&mut s, &TickInput::default(), 0.0);

    for _ in 0..15 {
        let t = s.target().expect("live target").clone();
        let at = t.window_start + 1.0;
        tick(&mut s, &click(&t, at), at);
    }
    // 5x1 + 5x2 + 5x3
    assert_eq!(s.game.score, 30);
    assert_eq!(s.game.combo, 15);
    assert_eq!(s.hud().multiplier, 4);
    assert!(s.game.on_fire);
}

#[test]
fn exactly_one_target_while_running() {
    let mut s = session(11);
    s.start(0.0);
    let mut now = 0.0;
    let mut spawned = 0;
    let mut resolved = 0;
    while now < 30_000.0 {
        now += 16.0;
        tick(&mut s, &TickInput::default(), now);
        for e in s.drain_events() {
            match e {
                GameEvent::Spawned { .. } => spawned += 1,
                GameEvent::Resolved { .. } => resolved += 1,
                _ => {}
            }
        }
        // Zero respawn delay: the replacement spawns in the same tick
        assert!(s.target().is_some());
        assert!(spawned - resolved == 1);
    }
    // Nobody clicked: every target timed out
    assert_eq!(s.game.hits, 0);
    assert_eq!(s.game.misses, resolved);
}

#[test]
fn stale_click_after_expiry_is_ignored() {
    let mut s = session(12);
    s.start(0.0);
    tick(&mut s, &TickInput::default(), 0.0);
    let old = s.target().unwrap().clone();
    tick(&mut s, &TickInput::default(), old.expires_at());
    assert_eq!(s.game.misses, 1);

    // Click reported against the old id after it was replaced
    let late = old.expires_at() + 5.0;
    tick(&mut s, &click(&old, late), late);
    assert_eq!(s.game.misses, 1);
    assert_eq!(s.game.hits, 0);
}

#[test]
fn early_click_with_combo_reports_loss() {
    let mut s = session(13);
    s.start(0.0);
    tick(&mut s, &TickInput::default(), 0.0);
    for _ in 0..3 {
        let t = s.target().unwrap().clone();
        let at = t.window_end;
        tick(&mut s, &click(&t, at), at);
    }
    assert_eq!(s.game.combo, 3);
    s.drain_events();

    let t = s.target().unwrap().clone();
    let at = t.window_start - 0.5;
    let at = at.max(t.spawn_time);
    tick(&mut s, &click(&t, at), at);
    let events = s.drain_events();
    if at < t.window_start {
        assert!(events.contains(&GameEvent::Miss {
            target: Some(t.id),
            kind: MissKind::TooEarly,
            at: None
        }));
        assert!(events.contains(&GameEvent::ComboLost { lost: 3 }));
        assert_eq!(s.game.combo, 0);
        assert_eq!(s.game.score, 3);
    }
}

#[test]
fn background_click_between_targets() {
    let mut s = Session::new(
        14,
        PlayArea::new(1280.0, 800.0, ViewportClass::Standard),
        Settings::default(),
        Tuning::default(),
    );
    s.start(0.0);
    let input = TickInput {
        pointer: vec![PointerEvent::up(50.0, PointerHit::Background).at(Vec2::new(5.0, 5.0))],
        pause: false,
    };
    tick(&mut s, &input, 100.0);
    assert!(s.target().is_none());
    assert_eq!(s.game.misses, 1);
    let events = s.drain_events();
    assert!(events.iter().any(|e| e.caption().as_deref() == Some("Miss!")));
}

#[test]
fn media_follows_a_short_session() {
    let mut s = session(15);
    let mut media = MediaDirector::new(&s.settings);
    s.start(0.0);
    tick(&mut s, &TickInput::default(), 0.0);
    let t = s.target().unwrap().clone();
    tick(&mut s, &click(&t, t.window_start), t.window_start);
    s.toggle_pause(t.window_start + 1.0);

    let events = s.drain_events();
    let commands = media.handle_all(&events);
    let effects: Vec<&str> = commands
        .iter()
        .filter_map(|c| match c {
            MediaCommand::PlayEffect { asset, .. } => Some(*asset),
            _ => None,
        })
        .collect();
    // pop, hit, pop for the replacement
    assert_eq!(effects, vec!["assets/pop.mp3", "assets/hit.mp3", "assets/pop.mp3"]);
    assert_eq!(commands.last(), Some(&MediaCommand::PauseVideo));
    assert_eq!(s.phase, GamePhase::Paused);
}

proptest! {
    #[test]
    fn prop_window_inside_lifespan(seed in any::<u64>()) {
        let mut s = session(seed);
        s.start(0.0);
        tick(&mut s, &TickInput::default(), 0.0);
        let t = s.target().unwrap();
        prop_assert!(t.spawn_time <= t.window_start);
        prop_assert!(t.window_start < t.window_end);
        prop_assert!(t.window_end <= t.spawn_time + t.lifespan);
    }

    #[test]
    fn prop_evaluate_partitions_timeline(seed in any::<u64>(), dt in -500.0f64..4000.0) {
        let mut s = session(seed);
        s.start(0.0);
        tick(&mut s, &TickInput::default(), 0.0);
        let t = s.target().unwrap();
        let at = t.spawn_time + dt;
        let outcome = t.evaluate(at);
        let early = at < t.window_start;
        let hit = t.window_start <= at && at <= t.window_end;
        let late = at > t.window_end;
        prop_assert_eq!([early, hit, late].iter().filter(|b| **b).count(), 1);
        prop_assert_eq!(outcome == reflex_pop::sim::Outcome::TooEarly, early);
        prop_assert_eq!(outcome == reflex_pop::sim::Outcome::Hit, hit);
        prop_assert_eq!(outcome == reflex_pop::sim::Outcome::TooLate, late);
    }

    #[test]
    fn prop_one_resolution_per_target(seed in any::<u64>(), offsets in prop::collection::vec(0.0f64..3500.0, 1..20)) {
        let mut s = session(seed);
        s.start(0.0);
        tick(&mut s, &TickInput::default(), 0.0);
        let mut score = 0u64;
        let mut combo = 0u32;
        for off in offsets {
            let t = s.target().unwrap().clone();
            let at = t.spawn_time + off;
            // Double click; clicks past the lifespan race the expiry timer
            let input = TickInput {
                pointer: vec![
                    PointerEvent::up(at, PointerHit::Target(t.id)),
                    PointerEvent::up(at + 1.0, PointerHit::Target(t.id)),
                ],
                pause: false,
            };
            let expected_hit = t.evaluate(at) == reflex_pop::sim::Outcome::Hit;
            let now = if at <= t.expires_at() { at + 1.0 } else { at };
            tick(&mut s, &input, now);
            if expected_hit {
                score += multiplier(combo) as u64;
                combo += 1;
            } else {
                combo = 0;
            }
            prop_assert_eq!(s.game.score, score);
            prop_assert_eq!(s.game.combo, combo);
        }
    }
}
