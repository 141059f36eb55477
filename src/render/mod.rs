//! Draw command emission
//!
//! The core never rasterizes anything. Each frame it produces an ordered
//! [`DrawList`] (painter's algorithm) that the backend replays.

pub mod hud;
pub mod scene;

use glam::{DVec2, Vec4};
use serde::Serialize;

use crate::assets;
use crate::error::GameError;
use crate::platform::SpriteSheet;
use crate::sim::Camera;

/// Linear RGBA color in [0, 1]
pub type Color = Vec4;

pub const WHITE: Color = Vec4::ONE;
pub const BLACK: Color = Vec4::new(0.0, 0.0, 0.0, 1.0);

/// Opaque color from 8-bit channels
pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Vec4::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
}

/// Uniform gray multiply, `v` in [0, 1]
pub fn gray(v: f32) -> Color {
    Vec4::new(v, v, v, 1.0)
}

/// White with the given opacity
pub fn translucent(alpha: f32) -> Color {
    Vec4::new(1.0, 1.0, 1.0, alpha)
}

/// Rectangle fill style
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Fill {
    Solid(Color),
    /// Corner colors: top-left, top-right, bottom-left, bottom-right
    Gradient([Color; 4]),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    /// Blit a sprite with its top-left corner at `at` (screen pixels)
    Sprite {
        name: String,
        at: DVec2,
        scale: f64,
        tint: Option<Color>,
    },
    /// Fill a screen rectangle
    Fill {
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        fill: Fill,
    },
}

impl DrawCommand {
    pub fn sprite_name(&self) -> Option<&str> {
        match self {
            DrawCommand::Sprite { name, .. } => Some(name),
            DrawCommand::Fill { .. } => None,
        }
    }
}

/// Ordered draw commands for one frame
#[derive(Debug, Clone, Default, Serialize)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn sprite(&mut self, name: impl Into<String>, at: DVec2, scale: f64, tint: Option<Color>) {
        self.commands.push(DrawCommand::Sprite {
            name: name.into(),
            at,
            scale,
            tint,
        });
    }

    pub fn fill(&mut self, x: i32, y: i32, w: i32, h: i32, fill: Fill) {
        self.commands.push(DrawCommand::Fill { x, y, w, h, fill });
    }

    /// Full-window black overlay; `fade` is clamped to [0, 1]
    pub fn fade_overlay(&mut self, window: (i32, i32), fade: f64) {
        let alpha = fade.clamp(0.0, 1.0) as f32;
        self.fill(
            0,
            0,
            window.0,
            window.1,
            Fill::Solid(Vec4::new(0.0, 0.0, 0.0, alpha)),
        );
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Sprite names in draw order
    pub fn sprite_names(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(DrawCommand::sprite_name)
    }

    /// Index of the first command drawing `name`
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.commands
            .iter()
            .position(|c| c.sprite_name() == Some(name))
    }

    /// Index of the last command drawing `name`
    pub fn last_position_of(&self, name: &str) -> Option<usize> {
        self.commands
            .iter()
            .rposition(|c| c.sprite_name() == Some(name))
    }
}

/// Places world-space sprites and rectangles through a camera snapshot
pub struct Painter<'a, S: SpriteSheet + ?Sized> {
    pub camera: Camera,
    pub screen: (f64, f64),
    sheet: &'a S,
    list: &'a mut DrawList,
}

impl<'a, S: SpriteSheet + ?Sized> Painter<'a, S> {
    pub fn new(camera: Camera, screen: (f64, f64), sheet: &'a S, list: &'a mut DrawList) -> Self {
        Self {
            camera,
            screen,
            sheet,
            list,
        }
    }

    /// Draw a sprite whose bottom-left corner sits at world (x, y)
    pub fn sprite(
        &mut self,
        name: &str,
        x: f64,
        y: f64,
        tint: Option<Color>,
    ) -> Result<(), GameError> {
        let (_, h) = assets::sprite_size(self.sheet, name)?;
        let at = self.camera.sprite_anchor(x, y, h as f64, self.screen.1);
        self.list.sprite(name, at, self.camera.scale, tint);
        Ok(())
    }

    /// Fill a world rectangle whose bottom-left corner is (x, y)
    pub fn fill(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
        let (sx, sy, sw, sh) = self.camera.world_rect_to_screen(x, y, w, h, self.screen.1);
        self.list.fill(sx, sy, sw, sh, Fill::Solid(color));
    }

    /// Screen-space fill, for layers that ignore the camera
    pub fn fill_screen(&mut self, x: i32, y: i32, w: i32, h: i32, fill: Fill) {
        self.list.fill(x, y, w, h, fill);
    }

    pub fn world_to_screen(&self, x: f64, y: f64) -> (i32, i32) {
        self.camera.world_to_screen(x, y, self.screen.1)
    }
}
