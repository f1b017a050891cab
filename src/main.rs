//! Reflex Pop entry point
//!
//! The web build is driven from the page through `reflex_pop::web::WebGame`.
//! Natively this runs a headless session with a scripted player and logs
//! everything that happens: `reflex-pop [seed] [seconds]`.

#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use reflex_pop::MediaDirector;
    use reflex_pop::settings::Settings;
    use reflex_pop::sim::{
        PlayArea, PointerEvent, PointerHit, Session, TickInput, ViewportClass, tick,
    };
    use reflex_pop::tuning::Tuning;

    /// Frame length of the simulated page (60 Hz)
    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// What the scripted player does with one target
    #[derive(Debug, Clone, Copy)]
    enum Plan {
        /// Click at this time
        Click(f64),
        /// Let it expire
        Ignore,
    }

    pub fn run(seed: u64, seconds: f64) {
        let area = PlayArea::new(1280.0, 800.0, ViewportClass::Standard);
        let settings = Settings::default();
        let mut media = MediaDirector::new(&settings);
        let mut session = Session::new(seed, area, settings, Tuning::default());
        let mut player = Pcg32::seed_from_u64(seed ^ 0x5eed);
        let mut plan: Option<(u32, Plan)> = None;

        let end = seconds * 1000.0;
        let mut now = 0.0;
        session.start(now);

        while now < end {
            now += FRAME_MS;
            let mut input = TickInput::default();

            if let Some(target) = session.target() {
                if plan.map(|(id, _)| id) != Some(target.id) {
                    let roll = player.random::<f32>();
                    let choice = if roll < 0.75 {
                        // Somewhere in the green window
                        Plan::Click(target.window_start + player.random::<f64>() * target.window_duration)
                    } else if roll < 0.9 {
                        Plan::Click(target.spawn_time + player.random::<f64>() * target.lifespan)
                    } else {
                        Plan::Ignore
                    };
                    log::debug!("target {}: {:?}", target.id, choice);
                    plan = Some((target.id, choice));
                }
                if let Some((id, Plan::Click(at))) = plan {
                    if at <= now {
                        let center = target.pos + Vec2::splat(target.size / 2.0);
                        input.pointer.push(PointerEvent::down(at - 40.0, PointerHit::Target(id)));
                        input.pointer.push(PointerEvent::up(at, PointerHit::Target(id)).at(center));
                        plan = Some((id, Plan::Ignore));
                    }
                }
            } else if player.random::<f32>() < 0.002 {
                // Impatient click on empty space between targets
                input.pointer.push(PointerEvent::up(now, PointerHit::Background));
            }

            tick(&mut session, &input, now);

            for event in session.drain_events() {
                match event.caption() {
                    Some(caption) => log::info!("[{:>6.0}ms] {}", now, caption),
                    None => log::debug!("[{:>6.0}ms] {:?}", now, event),
                }
                for command in media.handle(&event) {
                    log::trace!("media: {:?}", command);
                }
            }
        }

        let hud = session.hud();
        log::info!(
            "Done: score {}, hits {}, misses {}, best combo {}",
            hud.score,
            hud.hits,
            hud.misses,
            hud.best_combo
        );
        match serde_json::to_string_pretty(&hud) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("could not print summary: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Reflex Pop (native) starting headless autoplay...");
    log::info!("The playable version is the web build - build it with `wasm-pack build --target web`");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xC0FFEE);
    let seconds = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(60.0);

    autoplay::run(seed, seconds);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is reflex_pop::web::wasm_start, this is just to satisfy the compiler
}
