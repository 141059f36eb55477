//! In-memory backend
//!
//! Answers sprite queries from a size table, replays scripted key presses and
//! records what would have been drawn. Drives the demo binary and tests.

use std::collections::{BTreeMap, HashMap};

use log::debug;

use super::{FrameInput, Key, Platform, SpriteSheet, WindowRequest};
use crate::error::{AssetError, GameError};
use crate::render::{DrawCommand, DrawList};

/// Stand-in sprite dimensions used when no manifest is supplied
const PLACEHOLDER_SIZES: &[(&str, u32, u32)] = &[
    ("start_button", 40, 12),
    ("cursor", 5, 7),
    ("street", 60, 20),
    ("fence", 20, 6),
    ("fence_door_0", 20, 6),
    ("fence_door_1", 20, 6),
    ("fence_door_2", 20, 6),
    ("skyscraper_0", 60, 140),
    ("skyscraper_1", 60, 150),
    ("skyscraper_2", 60, 130),
    ("background_skyscraper_0", 40, 180),
    ("background_skyscraper_1", 40, 170),
    ("background_skyscraper_2", 40, 190),
    ("grass", 6, 3),
    ("tree_0", 30, 40),
    ("tree_1", 24, 36),
    ("trashcan", 5, 7),
    ("bush_0", 10, 6),
    ("bush_1", 12, 7),
    ("lamp_top", 8, 40),
    ("lamp_bottom", 4, 10),
    ("bike_0", 24, 16),
    ("bike_1", 24, 16),
    ("bike_2", 24, 16),
    ("bike_3", 24, 16),
    ("bike_back_0", 24, 16),
    ("bike_back_1", 24, 16),
    ("bike_back_2", 24, 16),
    ("bike_back_3", 24, 16),
    ("car_0", 60, 22),
    ("car_1", 60, 22),
    ("car_2", 60, 22),
    ("car_3", 60, 22),
    ("car_4", 60, 22),
    ("car_5", 60, 22),
    ("car_6", 60, 22),
    ("car_7", 60, 22),
    ("press_left", 30, 12),
    ("press_right", 30, 12),
    ("miles", 25, 5),
    ("dot", 4, 5),
    ("0", 4, 5),
    ("1", 4, 5),
    ("2", 4, 5),
    ("3", 4, 5),
    ("4", 4, 5),
    ("5", 4, 5),
    ("6", 4, 5),
    ("7", 4, 5),
    ("8", 4, 5),
    ("9", 4, 5),
];

/// Alternating left/right presses, starting with right
#[derive(Debug, Clone, Copy)]
struct PedalCadence {
    start_frame: u64,
    every: u64,
}

impl PedalCadence {
    fn key_at(&self, frame: u64) -> Option<Key> {
        if self.every == 0 || frame < self.start_frame {
            return None;
        }
        let step = frame - self.start_frame;
        if step % self.every != 0 {
            return None;
        }
        if (step / self.every) % 2 == 0 {
            Some(Key::Right)
        } else {
            Some(Key::Left)
        }
    }
}

pub struct HeadlessPlatform {
    sizes: HashMap<String, (u32, u32)>,
    loading_frames: u32,
    window: (u32, u32),
    frame: u64,
    scripted_keys: BTreeMap<u64, Vec<Key>>,
    scripted_clicks: BTreeMap<u64, (i32, i32)>,
    scripted_text: BTreeMap<u64, String>,
    cadence: Option<PedalCadence>,
    mouse: (i32, i32),
    drawn: DrawList,
    total_draws: u64,
    fullscreen: bool,
    cursor_visible: bool,
    close_requested: bool,
}

impl HeadlessPlatform {
    /// Backend with placeholder sprite sizes, all loaded immediately
    pub fn new(window: (u32, u32)) -> Self {
        let sizes = PLACEHOLDER_SIZES
            .iter()
            .map(|&(name, w, h)| (name.to_string(), (w, h)))
            .collect();
        Self::with_sizes(window, sizes)
    }

    /// Backend with sprite sizes from a JSON object of `name: [w, h]`
    pub fn from_manifest_json(window: (u32, u32), json: &str) -> Result<Self, GameError> {
        let sizes: HashMap<String, (u32, u32)> =
            serde_json::from_str(json).map_err(|e| GameError::AssetLoadFailure {
                name: "sprite manifest".to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self::with_sizes(window, sizes))
    }

    fn with_sizes(window: (u32, u32), sizes: HashMap<String, (u32, u32)>) -> Self {
        Self {
            sizes,
            loading_frames: 0,
            window,
            frame: 0,
            scripted_keys: BTreeMap::new(),
            scripted_clicks: BTreeMap::new(),
            scripted_text: BTreeMap::new(),
            cadence: None,
            mouse: (0, 0),
            drawn: DrawList::new(),
            total_draws: 0,
            fullscreen: false,
            cursor_visible: true,
            close_requested: false,
        }
    }

    /// Report every sprite as still loading until `frames` frames have been polled
    pub fn with_loading_frames(mut self, frames: u32) -> Self {
        self.loading_frames = frames;
        self
    }

    /// Drop a sprite so queries for it fail
    pub fn without_sprite(mut self, name: &str) -> Self {
        self.sizes.remove(name);
        self
    }

    pub fn with_key_at(mut self, frame: u64, key: Key) -> Self {
        self.scripted_keys.entry(frame).or_default().push(key);
        self
    }

    pub fn with_click_at(mut self, frame: u64, position: (i32, i32)) -> Self {
        self.scripted_clicks.insert(frame, position);
        self
    }

    pub fn with_text_at(mut self, frame: u64, text: &str) -> Self {
        self.scripted_text.entry(frame).or_default().push_str(text);
        self
    }

    /// Press right, then left, then right... every `every` frames from `start_frame`
    pub fn with_pedal_cadence(mut self, start_frame: u64, every: u64) -> Self {
        self.cadence = Some(PedalCadence { start_frame, every });
        self
    }

    pub fn resize(&mut self, window: (u32, u32)) {
        self.window = window;
    }

    /// Commands drawn during the most recent frame
    pub fn last_frame(&self) -> &DrawList {
        &self.drawn
    }

    pub fn total_draws(&self) -> u64 {
        self.total_draws
    }

    /// Frames polled so far
    pub fn frames(&self) -> u64 {
        self.frame
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn is_cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn close_requested(&self) -> bool {
        self.close_requested
    }
}

impl SpriteSheet for HeadlessPlatform {
    fn image_size(&self, name: &str) -> Result<(u32, u32), AssetError> {
        if self.loading_frames > 0 {
            return Err(AssetError::StillLoading);
        }
        self.sizes.get(name).copied().ok_or_else(|| {
            AssetError::Failed(format!("no bundled file {}", crate::assets::file_name(name)))
        })
    }
}

impl Platform for HeadlessPlatform {
    fn window_size(&self) -> (u32, u32) {
        self.window
    }

    fn poll_input(&mut self) -> FrameInput {
        self.loading_frames = self.loading_frames.saturating_sub(1);

        let frame = self.frame;
        self.frame += 1;
        self.drawn.clear();

        let mut pressed = self.scripted_keys.get(&frame).cloned().unwrap_or_default();
        if let Some(key) = self.cadence.and_then(|c| c.key_at(frame)) {
            pressed.push(key);
        }

        let mut clicks = 0;
        if let Some(&position) = self.scripted_clicks.get(&frame) {
            self.mouse = position;
            clicks = 1;
        }

        FrameInput {
            window_size: self.window,
            pressed,
            mouse: self.mouse,
            clicks,
            typed: self.scripted_text.get(&frame).cloned().unwrap_or_default(),
        }
    }

    fn draw(&mut self, command: &DrawCommand) -> Result<(), GameError> {
        if let DrawCommand::Sprite { name, scale, .. } = command {
            if !self.sizes.contains_key(name) {
                return Err(GameError::InvalidDrawArgument {
                    name: name.clone(),
                    reason: "unknown sprite".to_string(),
                });
            }
            if !scale.is_finite() || *scale < 0.0 {
                return Err(GameError::InvalidDrawArgument {
                    name: name.clone(),
                    reason: format!("scale {scale}"),
                });
            }
        }
        self.drawn.push(command.clone());
        self.total_draws += 1;
        Ok(())
    }

    fn apply(&mut self, request: WindowRequest) {
        debug!("Window request {request:?}");
        match request {
            WindowRequest::SetFullscreen(on) => self.fullscreen = on,
            WindowRequest::ShowCursor(visible) => self.cursor_visible = visible,
            WindowRequest::Close => self.close_requested = true,
        }
    }
}
