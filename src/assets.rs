//! Sprite manifest
//!
//! Every sprite the game draws is listed here. Backends resolve a sprite name
//! to its bundled file with [`file_name`].

use log::debug;

use crate::error::{AssetError, GameError};
use crate::platform::SpriteSheet;

/// All bundled sprites
pub const SPRITES: &[&str] = &[
    "start_button",
    "cursor",
    "street",
    "fence",
    "fence_door_0",
    "fence_door_1",
    "fence_door_2",
    "skyscraper_0",
    "skyscraper_1",
    "skyscraper_2",
    "background_skyscraper_0",
    "background_skyscraper_1",
    "background_skyscraper_2",
    "grass",
    "tree_0",
    "tree_1",
    "trashcan",
    "bush_0",
    "bush_1",
    "lamp_top",
    "lamp_bottom",
    "bike_0",
    "bike_1",
    "bike_2",
    "bike_3",
    "bike_back_0",
    "bike_back_1",
    "bike_back_2",
    "bike_back_3",
    "car_0",
    "car_1",
    "car_2",
    "car_3",
    "car_4",
    "car_5",
    "car_6",
    "car_7",
    "press_left",
    "press_right",
    "miles",
    "dot",
    "0",
    "1",
    "2",
    "3",
    "4",
    "5",
    "6",
    "7",
    "8",
    "9",
];

/// Bundled file for a sprite name, e.g. `bike_0` -> `bike_0.png`
pub fn file_name(sprite: &str) -> String {
    format!("{sprite}.png")
}

/// Outcome of polling the manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Ready,
    Loading { pending: usize },
}

/// Ask the backend for every sprite. Loading sprites are counted, any other
/// failure is fatal and names the sprite.
pub fn poll_manifest<S: SpriteSheet + ?Sized>(sheet: &S) -> Result<LoadStatus, GameError> {
    let mut pending = 0;
    for name in SPRITES {
        match sheet.image_size(name) {
            Ok(_) => {}
            Err(AssetError::StillLoading) => pending += 1,
            Err(err) => return Err(GameError::from_asset(name, err)),
        }
    }
    if pending == 0 {
        Ok(LoadStatus::Ready)
    } else {
        debug!("{pending} of {} sprites still loading", SPRITES.len());
        Ok(LoadStatus::Loading { pending })
    }
}

/// Dimensions of a sprite that must already be loaded
pub fn sprite_size<S: SpriteSheet + ?Sized>(
    sheet: &S,
    name: &str,
) -> Result<(i64, i64), GameError> {
    sheet
        .image_size(name)
        .map(|(w, h)| (i64::from(w), i64::from(h)))
        .map_err(|err| GameError::from_asset(name, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::HeadlessPlatform;

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("bike_0"), "bike_0.png");
        assert_eq!(file_name("7"), "7.png");
    }

    #[test]
    fn test_manifest_has_no_duplicates() {
        let mut names: Vec<_> = SPRITES.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SPRITES.len());
    }

    #[test]
    fn test_poll_reports_loading_then_ready() {
        let mut platform = HeadlessPlatform::new((1500, 800)).with_loading_frames(1);
        assert_eq!(
            poll_manifest(&platform).unwrap(),
            LoadStatus::Loading { pending: SPRITES.len() }
        );
        crate::platform::Platform::poll_input(&mut platform);
        assert_eq!(poll_manifest(&platform).unwrap(), LoadStatus::Ready);
    }

    #[test]
    fn test_poll_fails_on_missing_sprite() {
        let platform = HeadlessPlatform::new((1500, 800)).without_sprite("tree_1");
        let err = poll_manifest(&platform).unwrap_err();
        assert!(matches!(err, GameError::AssetLoadFailure { ref name, .. } if name == "tree_1"));
    }
}
