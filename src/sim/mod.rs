//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - One frame per `tick`, no wall-clock time
//! - Seeded, per-index RNG only
//! - No windowing or rendering backend dependencies

pub mod camera;
pub mod pattern;
pub mod race;
pub mod state;
pub mod tick;

pub use camera::{Camera, TileStrip, ViewWindow, tile_start};
pub use state::{GamePhase, GameState, PedalSide, RaceProgress, Vehicle};
pub use tick::{FrameOutput, tick};
