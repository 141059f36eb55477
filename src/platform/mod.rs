//! Platform abstraction layer
//!
//! The simulation never touches a window directly. Backends provide:
//! - Sprite dimensions (and whether a sprite is still loading)
//! - Per-frame input snapshots
//! - Drawing of the emitted command list, in order
//! - Window control (fullscreen, cursor, close)

pub mod headless;

use crate::error::{AssetError, GameError};
use crate::render::DrawCommand;

/// Read-only sprite queries. Must not block.
pub trait SpriteSheet {
    /// Pixel size of a sprite by name (see [`crate::assets::SPRITES`])
    fn image_size(&self, name: &str) -> Result<(u32, u32), AssetError>;
}

/// Everything the core needs from a windowing/rendering backend
pub trait Platform: SpriteSheet {
    fn window_size(&self) -> (u32, u32);

    /// Input collected since the previous frame
    fn poll_input(&mut self) -> FrameInput;

    /// Draw one command; later commands occlude earlier ones
    fn draw(&mut self, command: &DrawCommand) -> Result<(), GameError>;

    fn apply(&mut self, request: WindowRequest);
}

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    A,
    D,
    Space,
    Enter,
    NumEnter,
    Escape,
}

/// Input snapshot for a single frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Current window size in pixels
    pub window_size: (u32, u32),
    /// Keys pressed this frame
    pub pressed: Vec<Key>,
    /// Mouse position in window pixels
    pub mouse: (i32, i32),
    /// Mouse clicks this frame
    pub clicks: u32,
    /// Characters typed this frame
    pub typed: String,
}

impl FrameInput {
    pub fn was_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn pedal_left(&self) -> bool {
        self.was_pressed(Key::Left) || self.was_pressed(Key::A)
    }

    pub fn pedal_right(&self) -> bool {
        self.was_pressed(Key::Right) || self.was_pressed(Key::D)
    }

    /// Keyboard shortcut for the menu's start button
    pub fn start_requested(&self) -> bool {
        [Key::Space, Key::Enter, Key::NumEnter, Key::Escape]
            .iter()
            .any(|&k| self.was_pressed(k))
    }
}

/// Window changes requested by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowRequest {
    SetFullscreen(bool),
    ShowCursor(bool),
    Close,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pedal_keys_accept_arrows_and_wasd() {
        let input = FrameInput {
            pressed: vec![Key::A],
            ..Default::default()
        };
        assert!(input.pedal_left());
        assert!(!input.pedal_right());

        let input = FrameInput {
            pressed: vec![Key::Right],
            ..Default::default()
        };
        assert!(input.pedal_right());
    }

    #[test]
    fn test_start_shortcuts() {
        for key in [Key::Space, Key::Enter, Key::NumEnter, Key::Escape] {
            let input = FrameInput {
                pressed: vec![key],
                ..Default::default()
            };
            assert!(input.start_requested(), "{key:?} should start");
        }
        assert!(!FrameInput::default().start_requested());
    }
}
