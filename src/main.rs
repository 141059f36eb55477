//! City Bike entry point
//!
//! Runs the game against the headless backend: waits for sprites, presses
//! start, watches the intro and pedals through the race, then reports where
//! the run ended up.

use log::{error, info};

use city_bike::platform::Key;
use city_bike::platform::headless::HeadlessPlatform;
use city_bike::sim::GamePhase;
use city_bike::{Game, Settings};

/// Frame on which the scripted player presses start
const START_FRAME: u64 = 150;
/// Frames between scripted pedal presses
const PEDAL_EVERY: u64 = 6;

fn main() {
    env_logger::init();

    let settings = Settings::load();
    info!("{} (headless) starting...", settings.title);

    let mut platform = HeadlessPlatform::new(settings.window_size())
        .with_loading_frames(3)
        .with_key_at(START_FRAME, Key::Space)
        .with_pedal_cadence(START_FRAME, PEDAL_EVERY);
    let mut game = Game::new(settings);

    let mut last_phase = game.state.phase;
    for _ in 0..game.settings().headless_frames {
        if let Err(e) = game.frame(&mut platform) {
            error!("Fatal: {e}");
            std::process::exit(1);
        }
        if game.state.phase != last_phase {
            println!("frame {:>5}: {:?}", platform.frames(), game.state.phase);
            last_phase = game.state.phase;
        }
        if platform.close_requested() {
            info!("Window closed");
            break;
        }
    }

    if let Some(path) = &game.settings().snapshot_path {
        if let Err(e) = game.write_snapshot(path, platform.last_frame()) {
            error!("{e}");
        }
    }

    let state = &game.state;
    println!("frames simulated: {}", platform.frames());
    println!("draw commands:    {}", platform.total_draws());
    println!("phase:            {:?}", state.phase);
    if state.phase == GamePhase::Playing {
        println!("bike speed:       {:.3}", state.bike.speed);
        println!("car speed:        {:.3}", state.car.speed);
        println!("lead:             {:.1}", state.bike.x - state.car.x);
        println!("miles:            {:.3}", state.race.miles);
    }
}
