//! Deterministic street patterns
//!
//! Every function here maps a tile index to the same result on every call,
//! so the infinite street looks identical whenever a tile scrolls back into
//! view without storing anything per tile. Lookup tables repeat with their own
//! period; seeded choices use a fresh PCG stream keyed by the index.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::render::{Color, gray};

/// A sprite placed relative to its tile's origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoration {
    pub sprite: &'static str,
    pub dx: i64,
    pub dy: i64,
}

const fn deco(sprite: &'static str, dx: i64, dy: i64) -> Decoration {
    Decoration { sprite, dx, dy }
}

/// Which skyscraper slots are parks
const GAP_PATTERN: &[u8; 67] =
    b"    x      x           x                 x      x         x        ";

const GAP_LAYOUT_CYCLE: [usize; 12] = [0, 1, 2, 0, 2, 1, 0, 1, 0, 2, 0, 1];

/// Grass tufts drawn in every park
pub const PARK_GRASS: [Decoration; 7] = [
    deco("grass", 10, 19),
    deco("grass", 30, 40),
    deco("grass", 20, 53),
    deco("grass", 45, 61),
    deco("grass", 5, 74),
    deco("grass", 37, 87),
    deco("grass", 30, 110),
];

/// Tree arrangements for parks
pub const PARK_TREES: [&[Decoration]; 3] = [
    &[
        deco("tree_0", -17, 80),
        deco("tree_1", 31, 52),
        deco("tree_0", -6, 43),
    ],
    &[
        deco("tree_0", 15, 80),
        deco("tree_1", -15, 59),
        deco("tree_0", 40, 43),
        deco("tree_1", 12, 13),
    ],
    &[deco("tree_1", 3, 62), deco("tree_0", 20, 26)],
];

const SKYSCRAPERS: [&str; 3] = ["skyscraper_0", "skyscraper_1", "skyscraper_2"];
const SKYSCRAPER_CYCLE: [usize; 13] = [0, 1, 2, 1, 2, 0, 2, 1, 0, 1, 2, 0, 1];

/// Skyscraper brightness in percent
const SKYSCRAPER_BRIGHTNESS: [u8; 7] = [45, 57, 54, 63, 48, 60, 51];

const FENCE_DOORS: [&str; 3] = ["fence_door_0", "fence_door_1", "fence_door_2"];
const FENCE_DOOR_CYCLE: [usize; 11] = [0, 2, 0, 1, 0, 2, 1, 2, 0, 2, 1];

/// Bushes and trash cans in front of a skyscraper
pub const GROUND_DECORATIONS: [&[Decoration]; 5] = [
    &[
        deco("trashcan", -4, 5),
        deco("trashcan", -10, 4),
        deco("trashcan", 5, 3),
    ],
    &[deco("bush_0", -10, 4), deco("bush_1", 5, 3)],
    &[
        deco("bush_1", 10, 4),
        deco("trashcan", -8, 4),
        deco("trashcan", 5, 2),
    ],
    &[
        deco("bush_1", 10, 4),
        deco("bush_1", -9, 5),
        deco("bush_0", 2, 3),
    ],
    &[deco("trashcan", 8, 4), deco("bush_0", -5, 3)],
];
const GROUND_DECORATION_CYCLE: [usize; 18] = [4, 1, 0, 2, 4, 3, 1, 0, 2, 3, 2, 1, 2, 3, 1, 4, 2, 3];

const BACKGROUND_SKYSCRAPERS: [&str; 3] = [
    "background_skyscraper_0",
    "background_skyscraper_1",
    "background_skyscraper_2",
];
const BACKGROUND_CYCLE: [usize; 16] = [2, 1, 0, 2, 0, 1, 0, 2, 0, 2, 1, 0, 2, 1, 2, 0];

/// Stars scatter over this many world units above their base height
pub const STAR_SPREAD: i64 = 1200;

/// Entry of a repeating table for any index, negatives included
#[inline]
fn cycle<T: Copy, const N: usize>(table: &[T; N], index: i64) -> T {
    table[index.rem_euclid(N as i64) as usize]
}

/// Whether this skyscraper slot is a park instead
pub fn is_gap(index: i64) -> bool {
    cycle(GAP_PATTERN, index) == b'x'
}

/// Tree layout for a park, one of [`PARK_TREES`]
pub fn gap_decoration_set(index: i64) -> usize {
    cycle(&GAP_LAYOUT_CYCLE, index)
}

pub fn gap_trees(index: i64) -> &'static [Decoration] {
    PARK_TREES[gap_decoration_set(index)]
}

/// Building sprite variant, 0..3
pub fn skyscraper_variant(index: i64) -> usize {
    cycle(&SKYSCRAPER_CYCLE, index)
}

pub fn skyscraper_sprite(index: i64) -> &'static str {
    SKYSCRAPERS[skyscraper_variant(index)]
}

/// Brightness percent of a skyscraper
pub fn skyscraper_brightness(index: i64) -> u8 {
    cycle(&SKYSCRAPER_BRIGHTNESS, index)
}

pub fn skyscraper_tint(index: i64) -> Color {
    gray(f32::from(skyscraper_brightness(index)) / 100.0)
}

/// Fence door sprite variant, 0..3
pub fn fence_door_variant(index: i64) -> usize {
    cycle(&FENCE_DOOR_CYCLE, index)
}

pub fn fence_door_sprite(index: i64) -> &'static str {
    FENCE_DOORS[fence_door_variant(index)]
}

/// Ground layout in front of a skyscraper, one of [`GROUND_DECORATIONS`]
pub fn ground_decoration_set(index: i64) -> usize {
    cycle(&GROUND_DECORATION_CYCLE, index)
}

pub fn ground_decorations(index: i64) -> &'static [Decoration] {
    GROUND_DECORATIONS[ground_decoration_set(index)]
}

/// A far-away skyscraper with per-index jitter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundSkyscraper {
    pub sprite: &'static str,
    /// Horizontal jitter in [-5, 5)
    pub dx: i64,
    /// Vertical jitter in [-25, 0)
    pub dy: i64,
    /// Brightness in [0.4, 0.5)
    pub brightness: f64,
}

impl BackgroundSkyscraper {
    pub fn tint(&self) -> Color {
        gray(self.brightness as f32)
    }
}

/// Background skyscraper for `|index|`. The seeded stream is consumed in a
/// fixed order (dx, dy, brightness); changing it reshuffles the skyline.
pub fn background_skyscraper(index: i64) -> BackgroundSkyscraper {
    let index = index.unsigned_abs();
    let mut rng = Pcg32::seed_from_u64(index);
    let dx = rng.random_range(-5..5);
    let dy = rng.random_range(-25..0);
    let brightness = 0.4 + 0.1 * rng.random::<f64>();
    BackgroundSkyscraper {
        sprite: BACKGROUND_SKYSCRAPERS[BACKGROUND_CYCLE[(index % 16) as usize]],
        dx,
        dy,
        brightness,
    }
}

/// Vertical scatter of the star above tile `index`, in [0, STAR_SPREAD)
pub fn star_vertical_jitter(index: i64) -> i64 {
    Pcg32::seed_from_u64(index as u64).random_range(0..STAR_SPREAD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_gap_pattern_known_slots() {
        let gaps: Vec<i64> = (0..67).filter(|&i| is_gap(i)).collect();
        assert_eq!(gaps, vec![4, 11, 23, 41, 48, 58]);
    }

    #[test]
    fn test_variants_in_range() {
        for i in -200..200 {
            assert!(skyscraper_variant(i) < 3);
            assert!(fence_door_variant(i) < 3);
            assert!(gap_decoration_set(i) < 3);
            assert!(ground_decoration_set(i) < 5);
        }
    }

    #[test]
    fn test_known_table_entries() {
        assert_eq!(skyscraper_sprite(2), "skyscraper_2");
        assert_eq!(fence_door_sprite(3), "fence_door_1");
        assert_eq!(skyscraper_brightness(3), 63);
        assert_eq!(skyscraper_tint(0), gray(0.45));
        assert_eq!(ground_decorations(0).len(), 2);
        assert_eq!(gap_trees(1).len(), 4);
    }

    #[test]
    fn test_negative_index_wraps_like_positive() {
        assert_eq!(skyscraper_variant(-1), skyscraper_variant(12));
        assert_eq!(is_gap(-63), is_gap(4));
    }

    #[test]
    fn test_background_uses_absolute_index() {
        assert_eq!(background_skyscraper(-45), background_skyscraper(45));
        assert_eq!(background_skyscraper(0).sprite, "background_skyscraper_2");
    }

    #[test]
    fn test_background_is_not_constant() {
        let distinct: std::collections::HashSet<i64> =
            (0..50).map(|i| background_skyscraper(i * 15).dx).collect();
        assert!(distinct.len() > 1);
    }

    proptest! {
        #[test]
        fn prop_periodic_tables(i in -1_000_000i64..1_000_000) {
            prop_assert_eq!(is_gap(i), is_gap(i + 67));
            prop_assert_eq!(gap_decoration_set(i), gap_decoration_set(i + 12));
            prop_assert_eq!(skyscraper_variant(i), skyscraper_variant(i + 13));
            prop_assert_eq!(skyscraper_brightness(i), skyscraper_brightness(i + 7));
            prop_assert_eq!(fence_door_variant(i), fence_door_variant(i + 11));
            prop_assert_eq!(ground_decoration_set(i), ground_decoration_set(i + 18));
        }

        #[test]
        fn prop_background_skyscraper_reproducible(i in any::<i64>()) {
            let a = background_skyscraper(i);
            let b = background_skyscraper(i);
            prop_assert_eq!(a, b);
            prop_assert!((-5..5).contains(&a.dx));
            prop_assert!((-25..0).contains(&a.dy));
            prop_assert!(a.brightness >= 0.4 && a.brightness < 0.5);
        }

        #[test]
        fn prop_star_jitter_in_range(i in any::<i64>()) {
            let dy = star_vertical_jitter(i);
            prop_assert_eq!(dy, star_vertical_jitter(i));
            prop_assert!((0..STAR_SPREAD).contains(&dy));
        }
    }
}
