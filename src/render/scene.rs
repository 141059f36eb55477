//! Street scene composition
//!
//! Walks the visible world window back to front: sky, stars, distant skyline,
//! yards, parks and skyscrapers, fences, street and lamps. Every horizontal
//! strip is tiled on its own fixed global grid so panning never shifts seams.

use super::{Color, Fill, Painter, rgb};
use crate::assets;
use crate::error::GameError;
use crate::platform::SpriteSheet;
use crate::sim::camera::{TileStrip, ViewWindow};
use crate::sim::pattern;

const SKY_TOP: Color = rgb(12, 19, 34);
const SKY_HORIZON: Color = rgb(36, 34, 48);
const STAR: Color = rgb(255, 255, 200);
const FRONT_YARD: Color = rgb(38, 38, 38);
const PARK: Color = rgb(38, 56, 34);

/// World height where the sky gradient starts
const HORIZON_Y: f64 = 300.0;
/// Stars sit at least this high
const STAR_BASE_Y: i64 = 250;
/// Only every n-th tile gets a star
const STAR_EVERY: i64 = 3;

/// Background skyscrapers stand every n world units
const BACKGROUND_EVERY: i64 = 15;
/// They may jut into view from this far outside the window
const BACKGROUND_MARGIN: i64 = 20;
/// Height of their base above the street
const BACKGROUND_ELEVATION: i64 = 120;

const PARK_HEIGHT: i64 = 130;

const LAMP_GAP: i64 = 30;
const LAMP_OFFSET_X: i64 = -15;
const UPPER_LAMP_Y: i64 = 26;
const LOWER_LAMP_DX: i64 = 16;
const LOWER_LAMP_Y: i64 = 7;

/// Sprite dimensions the street layout depends on, in world units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreetLayout {
    pub street_w: i64,
    pub street_h: i64,
    pub fence_w: i64,
    pub fence_h: i64,
    /// Skyscraper width minus one unit of overlap
    pub slot_w: i64,
    pub bike_w: i64,
    pub car_w: i64,
    pub hint_w: i64,
    pub miles_w: i64,
}

impl StreetLayout {
    pub fn measure<S: SpriteSheet + ?Sized>(sheet: &S) -> Result<Self, GameError> {
        let (street_w, street_h) = assets::sprite_size(sheet, "street")?;
        let (fence_w, fence_h) = assets::sprite_size(sheet, "fence")?;
        let (skyscraper_w, _) = assets::sprite_size(sheet, "skyscraper_0")?;
        let (bike_w, _) = assets::sprite_size(sheet, "bike_0")?;
        let (car_w, _) = assets::sprite_size(sheet, "car_0")?;
        let (hint_w, _) = assets::sprite_size(sheet, "press_left")?;
        let (miles_w, _) = assets::sprite_size(sheet, "miles")?;

        let tiles = [
            ("street", street_w),
            ("fence", fence_w),
            ("skyscraper_0", skyscraper_w - 1),
        ];
        for (name, w) in tiles {
            if w <= 0 {
                return Err(GameError::InvalidDrawArgument {
                    name: name.to_string(),
                    reason: format!("too narrow to tile ({w})"),
                });
            }
        }

        Ok(Self {
            street_w,
            street_h,
            fence_w,
            fence_h,
            slot_w: skyscraper_w - 1,
            bike_w,
            car_w,
            hint_w,
            miles_w,
        })
    }

    /// The dark band between the upper fence and the buildings
    pub fn front_yard_h(&self) -> i64 {
        self.fence_h + 1
    }

    pub fn lamp_spacing(&self) -> i64 {
        self.street_w + LAMP_GAP
    }
}

/// Everything behind the vehicles: sky through the upper lamp posts
pub fn draw_backdrop<S: SpriteSheet + ?Sized>(
    p: &mut Painter<'_, S>,
    view: &ViewWindow,
    layout: &StreetLayout,
) -> Result<(), GameError> {
    draw_sky(p);
    draw_stars(p, view);
    draw_skyline(p, view, layout)?;
    draw_front_yard(p, view, layout);
    draw_parks(p, view, layout)?;
    draw_skyscrapers(p, view, layout)?;
    draw_fences_and_street(p, view, layout)?;
    draw_lamps(p, view, layout, "lamp_top", 0, UPPER_LAMP_Y)
}

/// Lamp bases in front of the vehicles
pub fn draw_foreground<S: SpriteSheet + ?Sized>(
    p: &mut Painter<'_, S>,
    view: &ViewWindow,
    layout: &StreetLayout,
) -> Result<(), GameError> {
    draw_lamps(p, view, layout, "lamp_bottom", LOWER_LAMP_DX, LOWER_LAMP_Y)
}

fn draw_sky<S: SpriteSheet + ?Sized>(p: &mut Painter<'_, S>) {
    let (w, h) = (p.screen.0 as i32, p.screen.1 as i32);
    let (_, horizon) = p.world_to_screen(0.0, HORIZON_Y);
    p.fill_screen(
        0,
        horizon,
        w,
        h,
        Fill::Gradient([SKY_TOP, SKY_TOP, SKY_HORIZON, SKY_HORIZON]),
    );
    p.fill_screen(0, 0, w, horizon, Fill::Solid(SKY_TOP));
}

fn draw_stars<S: SpriteSheet + ?Sized>(p: &mut Painter<'_, S>, view: &ViewWindow) {
    for x in (view.left..view.reach()).filter(|x| x.rem_euclid(STAR_EVERY) == 0) {
        let y = STAR_BASE_Y + pattern::star_vertical_jitter(x);
        let (sx, sy) = p.world_to_screen(x as f64, y as f64);
        p.fill_screen(sx, sy, 1, 1, Fill::Solid(STAR));
    }
}

fn draw_skyline<S: SpriteSheet + ?Sized>(
    p: &mut Painter<'_, S>,
    view: &ViewWindow,
    layout: &StreetLayout,
) -> Result<(), GameError> {
    let span = (view.left - BACKGROUND_MARGIN)..(view.reach() + BACKGROUND_MARGIN);
    for x in span.filter(|x| x.rem_euclid(BACKGROUND_EVERY) == 0) {
        let s = pattern::background_skyscraper(x);
        p.sprite(
            s.sprite,
            (x + s.dx) as f64,
            (layout.street_h + BACKGROUND_ELEVATION + s.dy) as f64,
            Some(s.tint()),
        )?;
    }
    Ok(())
}

fn draw_front_yard<S: SpriteSheet + ?Sized>(
    p: &mut Painter<'_, S>,
    view: &ViewWindow,
    layout: &StreetLayout,
) {
    p.fill(
        view.left as f64,
        layout.street_h as f64,
        (view.reach() - view.left) as f64,
        layout.front_yard_h() as f64,
        FRONT_YARD,
    );
}

fn draw_parks<S: SpriteSheet + ?Sized>(
    p: &mut Painter<'_, S>,
    view: &ViewWindow,
    layout: &StreetLayout,
) -> Result<(), GameError> {
    let base = layout.street_h;
    let slots = TileStrip::new(view.left, layout.slot_w, view.reach() + layout.slot_w);
    for (i, x) in slots {
        if !pattern::is_gap(i) {
            continue;
        }
        p.fill(
            x as f64,
            base as f64,
            layout.slot_w as f64,
            PARK_HEIGHT as f64,
            PARK,
        );
        for d in pattern::PARK_GRASS.iter().chain(pattern::gap_trees(i)) {
            p.sprite(d.sprite, (x + d.dx) as f64, (base + d.dy) as f64, None)?;
        }
    }
    Ok(())
}

fn draw_skyscrapers<S: SpriteSheet + ?Sized>(
    p: &mut Painter<'_, S>,
    view: &ViewWindow,
    layout: &StreetLayout,
) -> Result<(), GameError> {
    let base = layout.street_h;
    let slots = TileStrip::new(view.left, layout.slot_w, view.reach() + layout.slot_w);
    for (i, x) in slots {
        if pattern::is_gap(i) {
            continue;
        }
        p.sprite(
            pattern::skyscraper_sprite(i),
            x as f64,
            base as f64,
            Some(pattern::skyscraper_tint(i)),
        )?;
        for d in pattern::ground_decorations(i) {
            p.sprite(d.sprite, (x + d.dx) as f64, (base + d.dy) as f64, None)?;
        }
    }
    Ok(())
}

fn draw_fences_and_street<S: SpriteSheet + ?Sized>(
    p: &mut Painter<'_, S>,
    view: &ViewWindow,
    layout: &StreetLayout,
) -> Result<(), GameError> {
    let end = view.reach();
    for (i, x) in TileStrip::new(view.left, layout.fence_w, end) {
        let door = pattern::fence_door_sprite(i);
        p.sprite(door, x as f64, layout.street_h as f64, None)?;
    }
    for (_, x) in TileStrip::new(view.left, layout.street_w, end) {
        p.sprite("street", x as f64, 0.0, None)?;
    }
    for (_, x) in TileStrip::new(view.left, layout.fence_w, end) {
        p.sprite("fence", x as f64, 0.0, None)?;
    }
    Ok(())
}

fn draw_lamps<S: SpriteSheet + ?Sized>(
    p: &mut Painter<'_, S>,
    view: &ViewWindow,
    layout: &StreetLayout,
    sprite: &str,
    dx: i64,
    y: i64,
) -> Result<(), GameError> {
    let lamps = TileStrip::new(view.left, layout.lamp_spacing(), view.reach())
        .shifted(LAMP_OFFSET_X);
    for (_, x) in lamps {
        p.sprite(sprite, (x + dx) as f64, y as f64, None)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::HeadlessPlatform;
    use crate::render::{DrawCommand, DrawList};
    use crate::sim::Camera;

    fn compose(camera: Camera) -> DrawList {
        let platform = HeadlessPlatform::new((1500, 800));
        let layout = StreetLayout::measure(&platform).unwrap();
        let view = camera.visible_window(1500.0, 800.0);
        let mut list = DrawList::new();
        let mut painter = Painter::new(camera, (1500.0, 800.0), &platform, &mut list);
        draw_backdrop(&mut painter, &view, &layout).unwrap();
        draw_foreground(&mut painter, &view, &layout).unwrap();
        list
    }

    fn sprite_xs(list: &DrawList, prefix: &str, camera: &Camera) -> Vec<f64> {
        list.iter()
            .filter_map(|c| match c {
                DrawCommand::Sprite { name, at, .. } if name.starts_with(prefix) => {
                    Some(at.x / camera.scale - camera.offset_x)
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_layers_in_painter_order() {
        let list = compose(Camera::new(5.0));
        let first = |n: &str| list.position_of(n).unwrap_or_else(|| panic!("no {n}"));
        let last = |n: &str| list.last_position_of(n).unwrap();

        // sky fills come first
        assert!(matches!(
            list.iter().next(),
            Some(DrawCommand::Fill { fill: Fill::Gradient(_), .. })
        ));
        let skyline = last("background_skyscraper_0").max(last("background_skyscraper_1"));
        assert!(skyline < first("skyscraper_0"));
        assert!(last("skyscraper_0") < first("fence_door_0"));
        assert!(last("fence_door_0").max(last("fence_door_1")) < first("street"));
        assert!(last("street") < first("fence"));
        assert!(last("fence") < first("lamp_top"));
        assert!(last("lamp_top") < first("lamp_bottom"));
    }

    #[test]
    fn test_parks_replace_skyscrapers() {
        // slot 4 is a park, slot 3 is not; slot width 59
        let camera = Camera {
            offset_x: -3.0 * 59.0,
            ..Camera::new(5.0)
        };
        let list = compose(camera);
        let buildings = sprite_xs(&list, "skyscraper_", &camera);
        assert!(buildings.iter().any(|&x| (x - 177.0).abs() < 1e-9));
        assert!(!buildings.iter().any(|&x| (x - 236.0).abs() < 1e-9));
        assert!(list.position_of("grass").is_some());
        assert!(list.position_of("tree_0").is_some());
    }

    #[test]
    fn test_street_tiles_stay_on_grid_while_panning() {
        for pan in [0.0, -7.3, -59.9, -61.0, -1234.5] {
            let camera = Camera {
                offset_x: pan,
                ..Camera::new(10.0)
            };
            let list = compose(camera);
            for x in sprite_xs(&list, "street", &camera) {
                assert!((x.round() - x).abs() < 1e-6);
                assert_eq!((x.round() as i64).rem_euclid(60), 0, "pan {pan}");
            }
        }
    }

    #[test]
    fn test_stars_only_on_every_third_tile() {
        let camera = Camera::new(5.0);
        let list = compose(camera);
        let stars = list
            .iter()
            .filter(|c| matches!(c, DrawCommand::Fill { w: 1, h: 1, .. }))
            .count();
        // tiles 0..=300, every third
        assert_eq!(stars, 101);
    }

    /// Rightmost screen pixel reached by sprites whose name passes `matches`
    fn strip_reach_px(list: &DrawList, matches: impl Fn(&str) -> bool) -> f64 {
        let platform = HeadlessPlatform::new((1500, 800));
        list.iter()
            .filter_map(|c| match c {
                DrawCommand::Sprite { name, at, scale, .. } if matches(name) => {
                    let (w, _) = platform.image_size(name).unwrap();
                    Some(at.x + f64::from(w) * scale)
                }
                _ => None,
            })
            .fold(f64::MIN, f64::max)
    }

    #[test]
    fn test_strips_reach_right_edge_at_fractional_pans() {
        for scale in [5.0, 7.0, 10.0] {
            for pan in [-0.6, -0.99, -1.0099, -20.7, -100.9, -4321.49] {
                let camera = Camera {
                    offset_x: pan,
                    ..Camera::new(scale)
                };
                let list = compose(camera);
                let strips: [(&str, &dyn Fn(&str) -> bool); 3] = [
                    ("street", &|n| n == "street"),
                    ("fence", &|n| n == "fence"),
                    ("fence doors", &|n| n.starts_with("fence_door_")),
                ];
                for (strip, matches) in strips {
                    let reach = strip_reach_px(&list, matches);
                    assert!(
                        reach >= 1500.0,
                        "{strip} stops at {reach} px (scale {scale}, pan {pan})"
                    );
                }

                let yard = list
                    .iter()
                    .find_map(|c| match c {
                        DrawCommand::Fill { x, w, fill: Fill::Solid(color), .. }
                            if *color == FRONT_YARD =>
                        {
                            Some(x + w)
                        }
                        _ => None,
                    })
                    .unwrap();
                assert!(yard >= 1500, "yard stops at {yard} px (scale {scale}, pan {pan})");
            }
        }
    }

    #[test]
    fn test_same_view_same_scene() {
        let camera = Camera {
            offset_x: -4321.0,
            ..Camera::new(7.0)
        };
        assert_eq!(compose(camera).len(), compose(camera).len());
        assert_eq!(
            compose(camera).sprite_names().collect::<Vec<_>>(),
            compose(camera).sprite_names().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_narrow_tile_is_rejected() {
        let platform =
            HeadlessPlatform::from_manifest_json((800, 600), r#"{
                "street": [0, 20], "fence": [20, 6], "skyscraper_0": [60, 140],
                "bike_0": [24, 16], "car_0": [60, 22], "press_left": [30, 12], "miles": [25, 5]
            }"#)
            .unwrap();
        assert!(matches!(
            StreetLayout::measure(&platform),
            Err(GameError::InvalidDrawArgument { .. })
        ));
    }
}
