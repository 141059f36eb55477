//! Screen overlays: start menu, pedal hint and the distance counter

use glam::DVec2;

use super::{DrawList, Painter, WHITE, gray, translucent};
use crate::assets;
use crate::error::GameError;
use crate::platform::SpriteSheet;
use crate::sim::race;

/// Hint floats this high above the street
const HINT_Y: f64 = 70.0;
/// Width and top margin of a counter glyph, in world units
const GLYPH_ADVANCE: f64 = 5.0;

/// Start button placement in window pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartButton {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    /// Integer sprite scale (the menu stays pixel-crisp)
    pub scale: i32,
}

impl StartButton {
    /// Centered, scaled with the window height
    pub fn layout<S: SpriteSheet + ?Sized>(
        sheet: &S,
        window: (i32, i32),
    ) -> Result<Self, GameError> {
        let (w, h) = assets::sprite_size(sheet, "start_button")?;
        let scale = window.1 / 100;
        let (w, h) = (w as i32 * scale, h as i32 * scale);
        Ok(Self {
            x: (window.0 - w) / 2,
            y: (window.1 - h) / 2,
            w,
            h,
            scale,
        })
    }

    pub fn contains(&self, (mx, my): (i32, i32)) -> bool {
        self.x <= mx && mx < self.x + self.w && self.y <= my && my < self.y + self.h
    }
}

/// Start button (lit while hovered) and the menu's own cursor
pub fn draw_menu(list: &mut DrawList, button: &StartButton, mouse: (i32, i32)) {
    let tint = if button.contains(mouse) { WHITE } else { gray(0.5) };
    let scale = f64::from(button.scale);
    list.sprite(
        "start_button",
        DVec2::new(f64::from(button.x), f64::from(button.y)),
        scale,
        Some(tint),
    );
    list.sprite(
        "cursor",
        DVec2::new(f64::from(mouse.0 - 4), f64::from(mouse.1)),
        scale,
        None,
    );
}

/// Blinking left/right hint above the bike while the hint timer runs
pub fn draw_arrow_hint<S: SpriteSheet + ?Sized>(
    p: &mut Painter<'_, S>,
    timer: u32,
    bike_x: f64,
    bike_w: i64,
    hint_w: i64,
) -> Result<(), GameError> {
    let Some((sprite, alpha)) = race::arrow_hint(timer) else {
        return Ok(());
    };
    let x = bike_x + (bike_w - hint_w) as f64 / 2.0;
    p.sprite(sprite, x, HINT_Y, Some(translucent(alpha)))
}

/// Distance counter centered at the top of the window, e.g. `1.234 miles`
pub fn draw_distance<S: SpriteSheet + ?Sized>(
    list: &mut DrawList,
    sheet: &S,
    miles: f64,
    scale: f64,
    window_w: i32,
    miles_w: i64,
) -> Result<(), GameError> {
    let text = race::miles_text(miles);
    let advance = (GLYPH_ADVANCE * scale).round() as i32;
    let text_w = text.len() as i32 * advance + (scale * miles_w as f64).round() as i32;
    let y = f64::from((GLYPH_ADVANCE * scale).round() as i32);
    let mut x = (window_w - text_w) / 2;

    for c in text.chars() {
        let glyph = glyph_sprite(c).ok_or_else(|| GameError::InvalidDrawArgument {
            name: c.to_string(),
            reason: "no glyph".to_string(),
        })?;
        assets::sprite_size(sheet, glyph)?;
        list.sprite(glyph, DVec2::new(f64::from(x), y), scale, None);
        x += advance;
    }
    x += advance;
    list.sprite("miles", DVec2::new(f64::from(x), y), scale, None);
    Ok(())
}

/// Sprite for a counter character
fn glyph_sprite(c: char) -> Option<&'static str> {
    const DIGITS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];
    match c {
        '.' => Some("dot"),
        _ => c.to_digit(10).map(|d| DIGITS[d as usize]),
    }
}
