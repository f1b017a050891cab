//! Browser binding
//!
//! A thin `wasm-bindgen` wrapper the page drives: it forwards pointer input
//! with `Date.now()` timestamps, calls `frame()` from its animation loop, and
//! reads back JSON for the HUD, the target and the media commands.

use glam::Vec2;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::ambient::{Environment, MediaCommand, MediaDirector};
use crate::settings::{Settings, SettingsError};
use crate::sim::{
    GameEvent, PlayArea, PointerEvent, PointerHit, Session, TickInput, ViewportClass, tick,
};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
}

fn now_ms() -> f64 {
    js_sys::Date::now()
}

fn viewport_width() -> Option<f32> {
    web_sys::window()?.inner_width().ok()?.as_f64().map(|w| w as f32)
}

fn js_err(e: SettingsError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::warn!("serialization failed: {}", e);
        "null".to_string()
    })
}

#[wasm_bindgen]
pub struct WebGame {
    session: Session,
    media: MediaDirector,
    input: TickInput,
    events: Vec<GameEvent>,
    commands: Vec<MediaCommand>,
}

impl WebGame {
    fn area(width: f32, height: f32, tuning: &Tuning) -> PlayArea {
        let class = viewport_width()
            .map(|w| ViewportClass::from_viewport_width(w, tuning))
            .unwrap_or_default();
        PlayArea::new(width, height, class)
    }

    /// Move new events into the outbox and derive media commands
    fn collect(&mut self) {
        let events = self.session.drain_events();
        self.commands.extend(self.media.handle_all(&events));
        self.events.extend(events);
    }

    fn queue_pointer(&mut self, x: f32, y: f32, make: fn(f64, PointerHit) -> PointerEvent) {
        let now = now_ms();
        let pos = Vec2::new(x, y);
        let hit = self.session.hit_test(pos, now);
        self.input.pointer.push(make(now, hit).at(pos));
    }
}

#[wasm_bindgen]
impl WebGame {
    /// `settings` and `tuning` are optional JSON overrides
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: f32,
        height: f32,
        settings: Option<String>,
        tuning: Option<String>,
    ) -> Result<WebGame, JsValue> {
        let settings = match settings {
            Some(json) => Settings::from_json(&json).map_err(js_err)?,
            None => Settings::default(),
        };
        let tuning = match tuning {
            Some(json) => Tuning::from_json(&json).map_err(js_err)?,
            None => Tuning::default(),
        };
        let area = Self::area(width, height, &tuning);
        let seed = now_ms() as u64;
        log::info!("Reflex Pop ready (seed {}, {:?})", seed, area.class);

        let media = MediaDirector::new(&settings);
        Ok(WebGame {
            session: Session::new(seed, area, settings, tuning),
            media,
            input: TickInput::default(),
            events: Vec::new(),
            commands: Vec::new(),
        })
    }

    pub fn start(&mut self) -> bool {
        let started = self.session.start(now_ms());
        self.collect();
        started
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.queue_pointer(x, y, PointerEvent::down);
    }

    pub fn pointer_up(&mut self, x: f32, y: f32) {
        self.queue_pointer(x, y, PointerEvent::up);
    }

    pub fn toggle_pause(&mut self) {
        self.input.pause = !self.input.pause;
    }

    /// Advance to now; call once per animation frame
    pub fn frame(&mut self) {
        let input = std::mem::take(&mut self.input);
        tick(&mut self.session, &input, now_ms());
        self.collect();
    }

    pub fn set_environment(&mut self, name: &str) -> Result<bool, JsValue> {
        let env = Environment::parse(name).map_err(js_err)?;
        let changed = self.session.set_environment(env);
        self.collect();
        Ok(changed)
    }

    pub fn toggle_sound(&mut self) -> bool {
        let enabled = self.session.toggle_sound();
        self.collect();
        enabled
    }

    /// Read `document.visibilityState` and report changes
    pub fn sync_visibility(&mut self) {
        let visible = web_sys::window()
            .and_then(|w| w.document())
            .map(|d| d.visibility_state() == web_sys::VisibilityState::Visible)
            .unwrap_or(true);
        self.session.set_visible(visible);
        self.collect();
    }

    /// Hook to `window` focus
    pub fn window_focused(&mut self) {
        self.commands.extend(self.media.window_focused());
    }

    /// Hook to the background video's `ended`
    pub fn video_ended(&mut self) {
        self.commands.extend(self.media.video_ended());
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        let area = Self::area(width, height, &self.session.tuning);
        self.session.resize(area);
    }

    pub fn hud_json(&self) -> String {
        to_json(&self.session.hud())
    }

    pub fn target_json(&self) -> String {
        to_json(&self.session.target_view(now_ms()))
    }

    /// Events since the last call, each with its caption
    pub fn take_events_json(&mut self) -> String {
        #[derive(Serialize)]
        struct Captioned {
            event: GameEvent,
            caption: Option<String>,
            combo_style: bool,
        }
        let events: Vec<Captioned> = self
            .events
            .drain(..)
            .map(|event| Captioned {
                caption: event.caption(),
                combo_style: event.is_combo_caption(),
                event,
            })
            .collect();
        to_json(&events)
    }

    pub fn take_media_json(&mut self) -> String {
        to_json(&std::mem::take(&mut self.commands))
    }
}
