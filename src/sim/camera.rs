//! Camera and viewport transform
//!
//! World units grow up and to the right from the street's left origin; screen
//! pixels grow down from the window's top-left. The camera pans the world
//! (offset, in world units) and scales it (pixels per world unit).

use glam::DVec2;
use serde::Serialize;

/// Extra margin added before rounding so partially visible tiles are included
const VISIBLE_MARGIN: f64 = 0.51;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Camera {
    /// Horizontal pan in world units (always <= 0)
    pub offset_x: f64,
    /// Vertical pan in world units (always >= 0)
    pub offset_y: f64,
    /// Pixels per world unit (> 0)
    pub scale: f64,
    /// Transition overlay opacity. Drawn clamped to [0, 1] but allowed to run
    /// past either end so phases can hold at full black or full clear.
    pub fade: f64,
}

impl Camera {
    pub fn new(scale: f64) -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale,
            fade: 0.0,
        }
    }

    /// Keep the view right of the world origin and above the street
    pub fn clamp(&mut self) {
        self.offset_x = self.offset_x.min(0.0);
        self.offset_y = self.offset_y.max(0.0);
    }

    /// World point to the nearest screen pixel
    pub fn world_to_screen(&self, x: f64, y: f64, screen_h: f64) -> (i32, i32) {
        let sx = ((self.offset_x + x) * self.scale).round();
        let sy = (self.offset_y * self.scale + screen_h - self.scale * y).round();
        (sx as i32, sy as i32)
    }

    /// Top-left screen position for a sprite of height `sprite_h` whose
    /// bottom-left corner sits at world (x, y). Left unrounded so scaled
    /// sprites move smoothly.
    pub fn sprite_anchor(&self, x: f64, y: f64, sprite_h: f64, screen_h: f64) -> DVec2 {
        DVec2::new(
            (self.offset_x + x) * self.scale,
            self.offset_y * self.scale + screen_h - self.scale * (y + sprite_h),
        )
    }

    /// World rectangle (bottom-left corner x, y) to screen (x, y, w, h)
    pub fn world_rect_to_screen(
        &self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        screen_h: f64,
    ) -> (i32, i32, i32, i32) {
        (
            ((self.offset_x + x) * self.scale).round() as i32,
            (self.offset_y * self.scale + screen_h - self.scale * (y + h)).round() as i32,
            (w * self.scale).round() as i32,
            (h * self.scale).round() as i32,
        )
    }

    /// World tile bounds covering the screen, rounded outward
    pub fn visible_window(&self, screen_w: f64, screen_h: f64) -> ViewWindow {
        let left = ((-self.offset_x - VISIBLE_MARGIN).round() as i64).max(0);
        let width = (screen_w / self.scale + VISIBLE_MARGIN).round() as i64;
        let bottom = ((self.offset_y - VISIBLE_MARGIN).round() as i64).max(0);
        let height = (screen_h / self.scale + VISIBLE_MARGIN).round() as i64;
        ViewWindow {
            left,
            width,
            right: left + width - 1,
            bottom,
            height,
            top: bottom + height - 1,
        }
    }
}

/// Visible world range in whole world units (inclusive bounds)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewWindow {
    pub left: i64,
    pub width: i64,
    pub right: i64,
    pub bottom: i64,
    pub height: i64,
    pub top: i64,
}

impl ViewWindow {
    /// Horizontal center in world units
    pub fn center_x(&self) -> i64 {
        self.left + self.width / 2
    }

    /// Exclusive end for horizontal strips. The screen's right edge can sit up
    /// to one unit past `right + 1` at fractional pans; a strip whose last
    /// tile starts below this column always reaches it.
    pub fn reach(&self) -> i64 {
        self.right + 2
    }
}

/// First tile of a strip on the global grid: the one containing `left`.
/// Returns `(tile index, world x)`.
pub fn tile_start(left: i64, tile_w: i64) -> (i64, i64) {
    let index = left.div_euclid(tile_w);
    (index, index * tile_w)
}

/// Walks a horizontal strip of fixed-width tiles on the global grid.
///
/// Yields `(tile index, world x)` starting at the tile containing `left` and
/// stopping before `end`.
#[derive(Debug, Clone)]
pub struct TileStrip {
    index: i64,
    x: i64,
    step: i64,
    end: i64,
}

impl TileStrip {
    /// `tile_w` must be positive
    pub fn new(left: i64, tile_w: i64, end: i64) -> Self {
        debug_assert!(tile_w > 0);
        let (index, x) = tile_start(left, tile_w);
        Self {
            index,
            x,
            step: tile_w,
            end,
        }
    }

    /// Shift every tile by a constant world offset
    pub fn shifted(mut self, dx: i64) -> Self {
        self.x += dx;
        self
    }
}

impl Iterator for TileStrip {
    type Item = (i64, i64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.x >= self.end {
            return None;
        }
        let item = (self.index, self.x);
        self.index += 1;
        self.x += self.step;
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_world_origin_maps_to_bottom_left() {
        let camera = Camera::new(5.0);
        assert_eq!(camera.world_to_screen(0.0, 0.0, 800.0), (0, 800));
    }

    #[test]
    fn test_world_to_screen_pans_and_flips() {
        let camera = Camera {
            offset_x: -10.0,
            offset_y: 20.0,
            scale: 2.0,
            fade: 0.0,
        };
        assert_eq!(camera.world_to_screen(15.0, 30.0, 600.0), (10, 580));
    }

    #[test]
    fn test_visible_window_at_origin() {
        let view = Camera::new(5.0).visible_window(1500.0, 800.0);
        assert_eq!(view.left, 0);
        assert_eq!(view.width, 301);
        assert_eq!(view.right, 300);
        assert_eq!(view.reach(), 302);
        assert_eq!(view.bottom, 0);
        assert_eq!(view.height, 161);
    }

    #[test]
    fn test_visible_window_follows_pan() {
        let camera = Camera {
            offset_x: -123.4,
            offset_y: 40.0,
            scale: 10.0,
            fade: 0.0,
        };
        let view = camera.visible_window(1500.0, 800.0);
        assert_eq!(view.left, 123);
        assert_eq!(view.right, 123 + 151 - 1);
        assert_eq!(view.bottom, 39);
    }

    #[test]
    fn test_clamp() {
        let mut camera = Camera {
            offset_x: 12.0,
            offset_y: -3.0,
            scale: 5.0,
            fade: 0.0,
        };
        camera.clamp();
        assert_eq!((camera.offset_x, camera.offset_y), (0.0, 0.0));
    }

    #[test]
    fn test_tile_start_rounds_down() {
        assert_eq!(tile_start(130, 59), (2, 118));
        assert_eq!(tile_start(118, 59), (2, 118));
        assert_eq!(tile_start(-1, 20), (-1, -20));
    }

    #[test]
    fn test_tile_strip_starts_on_grid() {
        let tiles: Vec<_> = TileStrip::new(130, 59, 300).collect();
        assert_eq!(tiles, vec![(2, 118), (3, 177), (4, 236), (5, 295)]);
    }

    #[test]
    fn test_tile_strip_shift() {
        let tiles: Vec<_> = TileStrip::new(100, 90, 300).shifted(-15).collect();
        assert_eq!(tiles, vec![(1, 75), (2, 165), (3, 255)]);
    }

    proptest! {
        #[test]
        fn prop_tiles_land_on_global_grid(
            left in 0i64..100_000,
            tile_w in 1i64..200,
            span in 1i64..2000,
        ) {
            let mut first = true;
            for (index, x) in TileStrip::new(left, tile_w, left + span) {
                prop_assert_eq!(x, index * tile_w);
                prop_assert_eq!(x.rem_euclid(tile_w), 0);
                if first {
                    // the first tile covers `left`
                    prop_assert!(x <= left && left < x + tile_w);
                    first = false;
                }
            }
        }

        #[test]
        fn prop_strips_cover_screen(
            offset_x in -50_000.0f64..0.0,
            scale in 1.0f64..12.0,
            screen_w in 100.0f64..4000.0,
            tile_w in 1i64..200,
        ) {
            let camera = Camera { offset_x, offset_y: 0.0, scale, fade: 0.0 };
            let view = camera.visible_window(screen_w, 800.0);
            let world_left = -offset_x;
            let world_right = world_left + screen_w / scale;

            prop_assert!(view.left as f64 <= world_left);
            prop_assert!(view.reach() as f64 >= world_right - 1e-6);
            prop_assert!(view.width as f64 <= screen_w / scale + 2.0);

            let tiles: Vec<_> = TileStrip::new(view.left, tile_w, view.reach()).collect();
            let (_, first_x) = tiles[0];
            let (_, last_x) = tiles[tiles.len() - 1];
            prop_assert!(first_x as f64 <= world_left);
            prop_assert!((last_x + tile_w) as f64 >= world_right - 1e-6);
            // the overshoot stays within two units of the edge
            prop_assert!((last_x as f64) < world_right + 2.0);
        }
    }
}
