//! Runtime configuration
//!
//! Read from a JSON file named by `CITY_BIKE_SETTINGS`; every field is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::platform::WindowRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Window title handed to the backend
    pub title: String,
    /// Window size before going fullscreen
    pub window_width: u32,
    pub window_height: u32,
    /// Camera scale at startup
    pub initial_scale: f64,
    /// Switch to fullscreen once sprites are loaded
    pub fullscreen_on_start: bool,
    /// Hide the OS cursor once sprites are loaded (the menu draws its own)
    pub hide_cursor: bool,
    /// Typing this character closes the game from any phase
    pub debug_exit_char: Option<char>,
    /// Frames the headless runner simulates before stopping
    pub headless_frames: u64,
    /// Where the headless runner writes its final state and frame as JSON
    pub snapshot_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: "City Bike".to_string(),
            window_width: 1500,
            window_height: 800,
            initial_scale: crate::consts::INITIAL_SCALE,
            fullscreen_on_start: true,
            hide_cursor: true,
            debug_exit_char: Some('ö'),
            headless_frames: 3600,
            snapshot_path: None,
        }
    }
}

impl Settings {
    /// Environment variable naming a settings file
    pub const PATH_ENV: &'static str = "CITY_BIKE_SETTINGS";

    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    pub fn from_file(path: &Path) -> Result<Self, GameError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from `CITY_BIKE_SETTINGS`, falling back to defaults
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::PATH_ENV) else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::from_file(Path::new(&path)) {
            Ok(settings) => {
                log::info!("Loaded settings from {path}");
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings file {path}: {e}");
                Self::default()
            }
        }
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    /// Whether a window request from the simulation should reach the backend
    pub fn permits(&self, request: &WindowRequest) -> bool {
        match request {
            WindowRequest::SetFullscreen(true) => self.fullscreen_on_start,
            WindowRequest::ShowCursor(false) => self.hide_cursor,
            _ => true,
        }
    }

    /// Scale must stay positive or the camera transform degenerates
    fn sanitized(mut self) -> Self {
        if !(self.initial_scale.is_finite() && self.initial_scale > 0.0) {
            log::warn!(
                "Invalid initial scale {}, using {}",
                self.initial_scale,
                crate::consts::INITIAL_SCALE
            );
            self.initial_scale = crate::consts::INITIAL_SCALE;
        }
        self
    }
}
