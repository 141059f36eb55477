//! Per-frame state machine
//!
//! Advances the active phase by one frame and emits the frame's draw list.
//! Within the run phases, a transition takes effect immediately: the next
//! phase's update still runs in the same frame when it comes later in the
//! order bike, car, race, fade-in, ascent, zoom.

use log::{debug, info};

use super::camera::ViewWindow;
use super::race;
use super::state::{GamePhase, GameState};
use crate::assets::{self, LoadStatus};
use crate::consts::*;
use crate::ease_in_out_quad;
use crate::error::GameError;
use crate::platform::{FrameInput, SpriteSheet, WindowRequest};
use crate::render::hud::{self, StartButton};
use crate::render::scene::{self, StreetLayout};
use crate::render::{DrawList, Painter};

/// What a frame produced for the backend
#[derive(Debug, Default)]
pub struct FrameOutput {
    pub draws: DrawList,
    pub requests: Vec<WindowRequest>,
}

/// Advance the game by one frame
pub fn tick<S: SpriteSheet + ?Sized>(
    state: &mut GameState,
    input: &FrameInput,
    sheet: &S,
) -> Result<FrameOutput, GameError> {
    let mut out = FrameOutput::default();
    state.frame_count += 1;

    match state.phase {
        GamePhase::LoadingAssets => load(state, sheet, &mut out)?,
        GamePhase::FadingInMenu | GamePhase::FadingOutMenu => menu(state, input, sheet, &mut out)?,
        _ => run(state, input, sheet, &mut out)?,
    }
    Ok(out)
}

fn enter(state: &mut GameState, phase: GamePhase) {
    info!("{:?} -> {:?} (frame {})", state.phase, phase, state.frame_count);
    state.phase = phase;
}

fn window_of(input: &FrameInput) -> (i32, i32) {
    (input.window_size.0 as i32, input.window_size.1 as i32)
}

fn load<S: SpriteSheet + ?Sized>(
    state: &mut GameState,
    sheet: &S,
    out: &mut FrameOutput,
) -> Result<(), GameError> {
    match assets::poll_manifest(sheet)? {
        LoadStatus::Loading { pending } => {
            debug!("Waiting on {pending} sprites");
        }
        LoadStatus::Ready => {
            info!("All {} sprites loaded", assets::SPRITES.len());
            enter(state, GamePhase::FadingInMenu);
            state.camera.fade = MENU_FADE_START;
            out.requests.push(WindowRequest::SetFullscreen(true));
            out.requests.push(WindowRequest::ShowCursor(false));
        }
    }
    Ok(())
}

fn menu<S: SpriteSheet + ?Sized>(
    state: &mut GameState,
    input: &FrameInput,
    sheet: &S,
    out: &mut FrameOutput,
) -> Result<(), GameError> {
    let window = window_of(input);
    let button = StartButton::layout(sheet, window)?;
    hud::draw_menu(&mut out.draws, &button, input.mouse);

    let clicked = button.contains(input.mouse) && input.clicks > 0;
    if (clicked || input.start_requested()) && state.phase != GamePhase::FadingOutMenu {
        enter(state, GamePhase::FadingOutMenu);
    }

    let camera = &mut state.camera;
    match state.phase {
        GamePhase::FadingInMenu => camera.fade = (camera.fade - FADE_STEP).max(0.0),
        GamePhase::FadingOutMenu => {
            camera.fade += FADE_STEP;
            if camera.fade >= 1.0 {
                camera.fade = INTRO_FADE_START;
                camera.scale = INTRO_SCALE;
                camera.offset_x = INTRO_OFFSET_X;
                camera.offset_y = INTRO_OFFSET_Y;
                enter(state, GamePhase::FadingInGame);
            }
        }
        _ => {}
    }

    out.draws.fade_overlay(window, state.camera.fade);
    Ok(())
}

fn run<S: SpriteSheet + ?Sized>(
    state: &mut GameState,
    input: &FrameInput,
    sheet: &S,
    out: &mut FrameOutput,
) -> Result<(), GameError> {
    state.camera.clamp();

    let window = window_of(input);
    let screen = (f64::from(window.0), f64::from(window.1));
    let view = state.camera.visible_window(screen.0, screen.1);
    let layout = StreetLayout::measure(sheet)?;

    scene::draw_backdrop(
        &mut Painter::new(state.camera, screen, sheet, &mut out.draws),
        &view,
        &layout,
    )?;

    if state.phase == GamePhase::BikeComingIn {
        let sprite = bike_entrance(state, &view, &layout);
        let mut p = Painter::new(state.camera, screen, sheet, &mut out.draws);
        p.sprite(&sprite, state.bike.x, state.bike.y, None)?;
    }

    if state.phase == GamePhase::CarComingIn {
        car_entrance(state, &view, &layout);
        let mut p = Painter::new(state.camera, screen, sheet, &mut out.draws);
        p.sprite(&state.car.sprite("car"), state.car.x, state.car.y, None)?;
    }

    if state.phase == GamePhase::Playing {
        race::step(state, input, &view, layout.bike_w);

        let mut p = Painter::new(state.camera, screen, sheet, &mut out.draws);
        p.sprite(&state.bike.sprite("bike"), state.bike.x, state.bike.y, None)?;
        p.sprite(&state.car.sprite("car"), state.car.x, state.car.y, None)?;
        hud::draw_arrow_hint(
            &mut p,
            state.race.arrow_hint_timer,
            state.bike.x,
            layout.bike_w,
            layout.hint_w,
        )?;
        hud::draw_distance(
            &mut out.draws,
            sheet,
            state.race.miles,
            state.camera.scale,
            window.0,
            layout.miles_w,
        )?;
    }

    scene::draw_foreground(
        &mut Painter::new(state.camera, screen, sheet, &mut out.draws),
        &view,
        &layout,
    )?;

    if state.phase == GamePhase::FadingInGame {
        state.camera.fade -= FADE_STEP;
        out.draws.fade_overlay(window, state.camera.fade);
        if state.camera.fade < INTRO_FADE_END {
            enter(state, GamePhase::AscendingIntoGame);
        }
    }

    if state.phase == GamePhase::AscendingIntoGame {
        ascend(state);
    }

    if state.phase == GamePhase::ZoomingIntoGame {
        zoom(state, screen.0, &view, &layout);
    }

    state.camera.clamp();
    Ok(())
}

/// Drop the camera from the sky: speed up until halfway, then brake to a crawl
fn ascend(state: &mut GameState) {
    if state.camera.offset_y > ASCENT_BRAKE_HEIGHT {
        state.camera_speed_y -= ASCENT_ACCEL;
    } else {
        state.camera_speed_y = (state.camera_speed_y + ASCENT_ACCEL).min(ASCENT_MIN_SPEED);
    }
    state.camera.offset_y += state.camera_speed_y;
    if state.camera.offset_y < 0.0 {
        state.camera.offset_y = 0.0;
        enter(state, GamePhase::ZoomingIntoGame);
    }
}

/// Eased zoom to race scale, keeping the horizontal screen center fixed
fn zoom(state: &mut GameState, screen_w: f64, view: &ViewWindow, layout: &StreetLayout) {
    let before = screen_w / state.camera.scale;

    state.zoom_timer += 1;
    let t = f64::from(state.zoom_timer) * ZOOM_RATE;
    state.camera.scale = INTRO_SCALE + ease_in_out_quad(t.min(1.0)) * (RACE_SCALE - INTRO_SCALE);
    if t >= 1.0 {
        state.camera.scale = RACE_SCALE;
        state.bike.x = (view.left - 3 * layout.bike_w) as f64;
        state.bike.y = BIKE_Y;
        state.bike.speed = BIKE_ENTRANCE_SPEED;
        enter(state, GamePhase::BikeComingIn);
    }

    let after = screen_w / state.camera.scale;
    state.camera.offset_x += (after - before) / 2.0;
}

/// Ride the bike in; it glances back while crossing the center and speeds up
/// once past it. Returns the sprite to draw.
fn bike_entrance(state: &mut GameState, view: &ViewWindow, layout: &StreetLayout) -> String {
    let bike = &mut state.bike;
    bike.advance();
    bike.animate(race::bike_frame_interval(bike.speed));

    let x = bike.x.round() as i64 + layout.bike_w / 2;
    let center = view.center_x();
    let looking_back = (center - BIKE_LOOK_BACK_ZONE..=center + BIKE_LOOK_BACK_ZONE).contains(&x);
    if x > center + BIKE_LOOK_BACK_ZONE {
        bike.speed = (bike.speed + BIKE_ENTRANCE_ACCEL).min(BIKE_ENTRANCE_MAX_SPEED);
    }
    let sprite = bike.sprite(if looking_back { "bike_back" } else { "bike" });

    if x > view.right {
        state.car.x = (view.left - 2 * layout.car_w) as f64;
        state.car.y = CAR_Y;
        state.car.speed = CAR_ENTRANCE_SPEED;
        enter(state, GamePhase::CarComingIn);
    }
    sprite
}

/// Drive the car in at a fixed pace; once it has passed, line both up for the race
fn car_entrance(state: &mut GameState, view: &ViewWindow, layout: &StreetLayout) {
    state.car.advance();
    state.car.animate(CAR_FRAME_INTERVAL);

    if state.car.x.round() as i64 > view.right + layout.car_w {
        state.bike.x = (view.right + RACE_BIKE_LEAD) as f64;
        state.bike.speed = RACE_BIKE_SPEED;
        state.car.x = (view.right + RACE_CAR_LEAD) as f64;
        state.car.speed = RACE_CAR_SPEED;
        state.race.arrow_hint_timer = ARROW_HINT_FRAMES;
        enter(state, GamePhase::Playing);
    }
}
