//! Game state and core simulation types
//!
//! One `GameState` lives for the whole process and is mutated once per frame.

use serde::Serialize;

use super::camera::Camera;
use crate::consts::*;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum GamePhase {
    /// Waiting for every sprite to finish loading
    #[default]
    LoadingAssets,
    /// Menu fading in from black
    FadingInMenu,
    /// Start pressed, menu fading to black
    FadingOutMenu,
    /// Intro scene fading in over the night sky
    FadingInGame,
    /// Camera dropping from the sky to street level
    AscendingIntoGame,
    /// Eased zoom from the overview to race scale
    ZoomingIntoGame,
    /// Bike rides in from the left
    BikeComingIn,
    /// Car rides in from the left
    CarComingIn,
    /// The race
    Playing,
}

impl GamePhase {
    /// Menu phases consume Escape as a start request
    pub fn is_menu(&self) -> bool {
        matches!(self, GamePhase::FadingInMenu | GamePhase::FadingOutMenu)
    }
}

/// Side the player must pedal next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PedalSide {
    Left,
    #[default]
    Right,
}

impl PedalSide {
    pub fn flipped(self) -> Self {
        match self {
            PedalSide::Left => PedalSide::Right,
            PedalSide::Right => PedalSide::Left,
        }
    }
}

/// The bike or the car
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vehicle {
    /// World position of the sprite's bottom-left corner
    pub x: f64,
    pub y: f64,
    /// World units per frame
    pub speed: f64,
    /// Animation frame in [0, cycle_len)
    pub frame: u32,
    /// Frames left before the next animation frame
    pub frames_until_next: i32,
    pub cycle_len: u32,
}

impl Vehicle {
    pub fn new(cycle_len: u32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            speed: 0.0,
            frame: 0,
            frames_until_next: 0,
            cycle_len,
        }
    }

    pub fn bike() -> Self {
        Self::new(BIKE_FRAMES)
    }

    pub fn car() -> Self {
        Self::new(CAR_FRAMES)
    }

    /// Move by the current speed
    pub fn advance(&mut self) {
        self.x += self.speed;
    }

    /// Count down one frame; on expiry step the animation and wait `interval` frames
    pub fn animate(&mut self, interval: i32) {
        self.frames_until_next -= 1;
        if self.frames_until_next <= 0 {
            self.frame = (self.frame + 1) % self.cycle_len;
            self.frames_until_next = interval;
        }
    }

    /// Sprite name for the current animation frame, e.g. `car_3`
    pub fn sprite(&self, prefix: &str) -> String {
        format!("{prefix}_{}", self.frame)
    }
}

/// Race bookkeeping
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RaceProgress {
    /// Distance ridden, never decreases
    pub miles: f64,
    /// Frames left to show the pedal hint
    pub arrow_hint_timer: u32,
    pub expected_key: PedalSide,
}

/// Complete game state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub camera: Camera,
    /// Vertical camera speed during the ascent (world units/frame, negative is down)
    pub camera_speed_y: f64,
    /// Frames spent zooming
    pub zoom_timer: u32,
    pub bike: Vehicle,
    pub car: Vehicle,
    pub race: RaceProgress,
    /// Frames simulated so far
    pub frame_count: u64,
}

impl GameState {
    pub fn new(scale: f64) -> Self {
        Self {
            phase: GamePhase::LoadingAssets,
            camera: Camera::new(scale),
            camera_speed_y: 0.0,
            zoom_timer: 0,
            bike: Vehicle::bike(),
            car: Vehicle::car(),
            race: RaceProgress::default(),
            frame_count: 0,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(INITIAL_SCALE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = GameState::default();
        assert_eq!(state.phase, GamePhase::LoadingAssets);
        assert_eq!(state.camera.scale, 5.0);
        assert_eq!(state.bike.cycle_len, 4);
        assert_eq!(state.car.cycle_len, 8);
    }

    #[test]
    fn test_animation_cycles() {
        let mut car = Vehicle::car();
        let mut frames = Vec::new();
        for _ in 0..40 {
            car.animate(4);
            frames.push(car.frame);
            assert!(car.frame < car.cycle_len);
        }
        // first call steps immediately, then every fourth call
        assert_eq!(&frames[..6], &[1, 1, 1, 1, 2, 2]);
        assert_eq!(frames[28], 0);
    }

    #[test]
    fn test_sprite_name() {
        let mut bike = Vehicle::bike();
        bike.frame = 3;
        assert_eq!(bike.sprite("bike_back"), "bike_back_3");
    }

    #[test]
    fn test_pedal_side_flip() {
        assert_eq!(PedalSide::Left.flipped(), PedalSide::Right);
        assert_eq!(PedalSide::default().flipped(), PedalSide::Left);
    }
}
