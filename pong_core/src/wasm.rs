//! WASM bridge module for JavaScript interop

use crate::{Command, Config, DifficultyProfile, Game, GameMode, Intent};
use std::time::Duration;
use wasm_bindgen::prelude::*;

macro_rules! console_log {
    ($($t:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        web_sys::console::log_1(&format!($($t)*).into());
        #[cfg(not(target_arch = "wasm32"))]
        tracing::warn!($($t)*);
    }};
}

/// Parse and validate a JSON config, falling back to defaults
fn config_from_json(config_json: &str) -> Config {
    if config_json.trim().is_empty() {
        return Config::default();
    }
    match serde_json::from_str::<Config>(config_json) {
        Ok(config) => match config.validate() {
            Ok(()) => config,
            Err(e) => {
                console_log!("Rejected config, using defaults: {}", e);
                Config::default()
            }
        },
        Err(e) => {
            console_log!("Failed to parse config JSON, using defaults: {}", e);
            Config::default()
        }
    }
}

/// WASM-compatible wrapper around the core Game engine
#[wasm_bindgen]
pub struct WasmSession {
    inner: Game,
    /// Last usable host clock value
    last_now: Duration,
}

#[wasm_bindgen]
impl WasmSession {
    /// Create a session from JSON configuration.
    ///
    /// `touch` selects the touch difficulty profile (slower ball, fallible
    /// opponent). An empty or invalid config falls back to defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: String, touch: bool) -> WasmSession {
        console_error_panic_hook::set_once();

        let config = config_from_json(&config_json);
        let profile = DifficultyProfile::for_context(touch);
        WasmSession {
            inner: Game::new(config, profile),
            last_now: Duration::ZERO,
        }
    }

    /// Run one frame. `now_ms` is `performance.now()` (or any monotonic
    /// millisecond clock). Returns the JSON-serialized frame. A non-finite
    /// clock value reuses the previous one.
    pub fn tick(&mut self, now_ms: f64) -> String {
        if now_ms.is_finite() {
            self.last_now = Duration::from_secs_f64(now_ms.max(0.0) / 1000.0);
        }
        let frame = self.inner.tick(self.last_now);
        match serde_json::to_string(&frame) {
            Ok(json) => json,
            Err(e) => {
                console_log!("Failed to serialize frame: {}", e);
                "{}".to_string()
            }
        }
    }

    /// Run one frame on the wall clock, for hosts without a frame timestamp
    pub fn tick_now(&mut self) -> String {
        self.tick(js_sys::Date::now())
    }

    /// Get the current view as JSON string
    pub fn view_json(&self) -> String {
        match serde_json::to_string(&self.inner.view()) {
            Ok(json) => json,
            Err(e) => {
                console_log!("Failed to serialize view: {}", e);
                "{}".to_string()
            }
        }
    }

    /// Primary paddle intent: -1 up, 0 hold, 1 down
    pub fn set_primary_vertical(&mut self, axis: i8) {
        self.inner.set_primary_vertical(Intent::from_axis(axis));
    }

    /// Second player intent (two-player mode only): -1 up, 0 hold, 1 down
    pub fn set_secondary_vertical(&mut self, axis: i8) {
        self.inner.set_secondary_vertical(Intent::from_axis(axis));
    }

    /// Steer the primary paddle toward a touch point (field coordinates)
    pub fn touch_primary(&mut self, touch_y: f32) {
        let intent = Intent::toward(touch_y, &self.inner.paddles[0]);
        self.inner.set_primary_vertical(intent);
    }

    pub fn start(&mut self) -> bool {
        self.inner.command(Command::Start)
    }

    pub fn pause(&mut self) -> bool {
        self.inner.command(Command::Pause)
    }

    /// Start/pause toggle for a single button
    pub fn toggle(&mut self) -> bool {
        if self.inner.is_active() {
            self.pause()
        } else {
            self.start()
        }
    }

    pub fn reset(&mut self) -> bool {
        self.inner.command(Command::Reset)
    }

    pub fn play_again(&mut self) -> bool {
        self.inner.command(Command::PlayAgain)
    }

    pub fn set_two_player(&mut self, two_player: bool) -> bool {
        let mode = if two_player {
            GameMode::TwoPlayer
        } else {
            GameMode::SinglePlayer
        };
        self.inner.command(Command::SetMode(mode))
    }

    pub fn set_bounds(&mut self, width: f32, height: f32) {
        self.inner.set_bounds(width, height);
    }

    /// Check if the game is currently active (accepting inputs)
    pub fn is_active(&self) -> bool {
        self.inner.is_active()
    }

    /// Get a human-readable status string
    pub fn status_string(&self) -> String {
        self.inner.status_string().to_string()
    }
}
