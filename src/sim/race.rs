//! Race physics
//!
//! The player keeps the bike rolling by alternating left and right presses;
//! the car shadows the bike's pace but never drops below its cruising speed.

use super::camera::ViewWindow;
use super::state::{GameState, PedalSide};
use crate::consts::*;
use crate::platform::FrameInput;

/// Frames between hint sprite swaps
const ARROW_HINT_SWAP_FRAMES: u32 = 15;
/// The hint fades out over its last frames
const ARROW_HINT_FADE_FRAMES: u32 = 100;

/// Camera follow blend (share of the old offset kept each frame)
const CAMERA_FOLLOW: f64 = 0.95;

/// Apply drag and one frame of pedaling to the bike speed.
///
/// A press on the expected side boosts and flips the expectation; a press on
/// the other side costs extra drag. Returns the clamped speed.
pub fn pedal(speed: f64, expected: &mut PedalSide, left: bool, right: bool) -> f64 {
    let mut speed = speed * BIKE_DRAG;

    let (hit, miss) = match expected {
        PedalSide::Left => (left, right),
        PedalSide::Right => (right, left),
    };
    if hit {
        speed /= PEDAL_BOOST;
        *expected = expected.flipped();
    } else if miss {
        speed *= WRONG_PEDAL_PENALTY;
    }

    speed.clamp(BIKE_MIN_SPEED, BIKE_MAX_SPEED)
}

/// Car speed after one frame of chasing `bike_speed`: catches up quickly,
/// falls back slowly, never below its cruising floor
pub fn chase(car_speed: f64, bike_speed: f64) -> f64 {
    let blended = if car_speed < bike_speed {
        0.9 * car_speed + 0.1 * bike_speed
    } else {
        0.995 * car_speed + 0.005 * bike_speed
    };
    blended.max(CAR_MIN_SPEED)
}

/// Frames per bike animation step; faster riding spins the wheels faster
pub fn bike_frame_interval(speed: f64) -> i32 {
    (4.0 / speed).round() as i32
}

/// Camera offset that centers the bike in the visible width
pub fn follow_target(bike_x: f64, bike_w: i64, view: &ViewWindow) -> f64 {
    -(bike_x - bike_w as f64 / 2.0 - view.width as f64 / 2.0)
}

/// Pedal hint sprite and opacity while the hint timer runs
pub fn arrow_hint(timer: u32) -> Option<(&'static str, f32)> {
    if timer == 0 {
        return None;
    }
    let sprite = if (timer / ARROW_HINT_SWAP_FRAMES) % 2 == 0 {
        "press_right"
    } else {
        "press_left"
    };
    let alpha = if timer < ARROW_HINT_FADE_FRAMES {
        timer as f32 / ARROW_HINT_FADE_FRAMES as f32
    } else {
        1.0
    };
    Some((sprite, alpha))
}

/// Distance as shown on screen
pub fn miles_text(miles: f64) -> String {
    format!("{miles:.3}")
}

/// Advance the race by one frame
pub fn step(state: &mut GameState, input: &FrameInput, view: &ViewWindow, bike_w: i64) {
    let race = &mut state.race;

    state.bike.speed = pedal(
        state.bike.speed,
        &mut race.expected_key,
        input.pedal_left(),
        input.pedal_right(),
    );
    state.car.speed = chase(state.car.speed, state.bike.speed);

    state.bike.advance();
    state.car.advance();

    let target = follow_target(state.bike.x, bike_w, view);
    state.camera.offset_x = CAMERA_FOLLOW * state.camera.offset_x + (1.0 - CAMERA_FOLLOW) * target;

    state.bike.animate(bike_frame_interval(state.bike.speed));
    state.car.animate(CAR_FRAME_INTERVAL);

    race.arrow_hint_timer = race.arrow_hint_timer.saturating_sub(1);
    race.miles += state.bike.speed * MILES_PER_UNIT;
}
