//! City Bike - a bicycle racing a car down a procedurally decorated street
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pattern generators, camera, phases, race physics)
//! - `render`: Draw commands and scene composition
//! - `platform`: Backend traits the core consumes, plus a headless backend
//! - `assets`: Sprite manifest and load polling
//! - `settings`: Runtime configuration

pub mod assets;
pub mod error;
pub mod platform;
pub mod render;
pub mod settings;
pub mod sim;

pub use error::{AssetError, GameError};
pub use settings::Settings;

use std::path::Path;

use log::info;
use serde::Serialize;

use platform::{FrameInput, Platform, WindowRequest};
use render::DrawList;
use sim::{GameState, tick};

/// Game configuration constants
pub mod consts {
    /// Camera scale at process start (world units to pixels)
    pub const INITIAL_SCALE: f64 = 5.0;

    /// Camera pose when the intro cinematic begins
    pub const INTRO_OFFSET_X: f64 = -100.0;
    pub const INTRO_OFFSET_Y: f64 = 300.0;
    pub const INTRO_SCALE: f64 = 3.0;
    /// Scale once the zoom-in has finished
    pub const RACE_SCALE: f64 = 10.0;

    /// Fade value right after all sprites loaded (overshoots 1 to hold black briefly)
    pub const MENU_FADE_START: f64 = 1.1;
    /// Fade value when the intro starts (overshoot holds full black)
    pub const INTRO_FADE_START: f64 = 1.4;
    /// Fade drops past zero to this before the ascent begins
    pub const INTRO_FADE_END: f64 = -0.3;
    /// Fade change per frame
    pub const FADE_STEP: f64 = 0.01;

    /// Vertical camera acceleration during the ascent
    pub const ASCENT_ACCEL: f64 = 0.02;
    /// Ascent decelerates below this camera height
    pub const ASCENT_BRAKE_HEIGHT: f64 = 150.0;
    /// Slowest allowed descent speed once braking
    pub const ASCENT_MIN_SPEED: f64 = -0.1;

    /// Normalized zoom time gained per frame
    pub const ZOOM_RATE: f64 = 0.005;

    /// Bike/car sprite elevation above the street baseline
    pub const BIKE_Y: f64 = 24.0;
    pub const CAR_Y: f64 = 21.0;

    /// Bike entrance
    pub const BIKE_ENTRANCE_SPEED: f64 = 0.5;
    pub const BIKE_ENTRANCE_ACCEL: f64 = 0.007;
    pub const BIKE_ENTRANCE_MAX_SPEED: f64 = 1.0;
    /// Half-width of the zone around the screen center where the bike looks back
    pub const BIKE_LOOK_BACK_ZONE: i64 = 20;
    /// Car entrance speed
    pub const CAR_ENTRANCE_SPEED: f64 = 1.5;

    /// Race start
    pub const RACE_BIKE_SPEED: f64 = 0.9;
    pub const RACE_CAR_SPEED: f64 = 0.75;
    pub const RACE_BIKE_LEAD: i64 = 140;
    pub const RACE_CAR_LEAD: i64 = 10;
    pub const ARROW_HINT_FRAMES: u32 = 600;

    /// Race physics
    pub const BIKE_DRAG: f64 = 0.9975;
    pub const PEDAL_BOOST: f64 = 0.96;
    pub const WRONG_PEDAL_PENALTY: f64 = 0.9975;
    pub const BIKE_MIN_SPEED: f64 = 0.1;
    pub const BIKE_MAX_SPEED: f64 = 1.75;
    pub const CAR_MIN_SPEED: f64 = 1.0;
    pub const MILES_PER_UNIT: f64 = 0.0001;

    /// Animation
    pub const BIKE_FRAMES: u32 = 4;
    pub const CAR_FRAMES: u32 = 8;
    pub const CAR_FRAME_INTERVAL: i32 = 4;
}

/// Quadratic ease-in-out on `t` in [0, 1]
#[inline]
pub fn ease_in_out_quad(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

/// Game state together with the last frame drawn from it
#[derive(Serialize)]
struct Snapshot<'a> {
    state: &'a GameState,
    frame: &'a DrawList,
}

/// Owns the simulation context and drives it one frame at a time
pub struct Game {
    pub state: GameState,
    settings: Settings,
}

impl Game {
    pub fn new(settings: Settings) -> Self {
        Self {
            state: GameState::new(settings.initial_scale),
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run a single frame: poll input, advance the simulation, hand the draw list to the backend
    pub fn frame<P: Platform>(&mut self, platform: &mut P) -> Result<(), GameError> {
        let input = platform.poll_input();

        let mut requests = Vec::new();
        if self.wants_exit(&input) {
            info!("Close requested in phase {:?}", self.state.phase);
            requests.push(WindowRequest::Close);
        }

        let output = tick(&mut self.state, &input, &*platform)?;

        for command in output.draws.iter() {
            platform.draw(command)?;
        }
        for request in requests.into_iter().chain(output.requests) {
            if self.settings.permits(&request) {
                platform.apply(request);
            }
        }
        Ok(())
    }

    /// Pretty JSON of the current state and `frame`, for inspecting a run
    pub fn snapshot_json(&self, frame: &DrawList) -> Result<String, GameError> {
        let snapshot = Snapshot {
            state: &self.state,
            frame,
        };
        serde_json::to_string_pretty(&snapshot).map_err(GameError::SnapshotEncode)
    }

    pub fn write_snapshot(&self, path: &Path, frame: &DrawList) -> Result<(), GameError> {
        let json = self.snapshot_json(frame)?;
        std::fs::write(path, json).map_err(|e| GameError::SnapshotWrite {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        info!("Wrote snapshot to {}", path.display());
        Ok(())
    }

    /// Escape closes the game outside the menu (where it starts the race instead);
    /// the debug exit character closes it anywhere.
    fn wants_exit(&self, input: &FrameInput) -> bool {
        let debug_exit = self
            .settings
            .debug_exit_char
            .is_some_and(|c| input.typed.contains(c));
        let escape = input.was_pressed(platform::Key::Escape) && !self.state.phase.is_menu();
        debug_exit || escape
    }
}
