//! Error types
//!
//! Only `AssetError::StillLoading` is recoverable; everything surfaced as a
//! `GameError` ends the run.

use thiserror::Error;

/// Result of asking the backend about a sprite
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// The image is still being decoded; ask again next frame
    #[error("still loading")]
    StillLoading,
    #[error("{0}")]
    Failed(String),
}

#[derive(Error, Debug)]
pub enum GameError {
    #[error("asset {name} is still loading")]
    AssetStillLoading { name: String },

    #[error("failed to load {name}: {reason}")]
    AssetLoadFailure { name: String, reason: String },

    #[error("invalid draw of {name}: {reason}")]
    InvalidDrawArgument { name: String, reason: String },

    #[error("failed to read settings: {0}")]
    SettingsIo(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    SettingsParse(#[from] serde_json::Error),

    #[error("failed to encode snapshot: {0}")]
    SnapshotEncode(#[source] serde_json::Error),

    #[error("failed to write snapshot {path}: {reason}")]
    SnapshotWrite { path: String, reason: String },
}

impl GameError {
    /// Attach the sprite name to a backend asset error
    pub fn from_asset(name: &str, err: AssetError) -> Self {
        match err {
            AssetError::StillLoading => GameError::AssetStillLoading {
                name: name.to_string(),
            },
            AssetError::Failed(reason) => GameError::AssetLoadFailure {
                name: name.to_string(),
                reason,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_names_the_asset() {
        let err = GameError::from_asset("bike_0", AssetError::Failed("bad png".into()));
        assert_eq!(err.to_string(), "failed to load bike_0: bad png");
    }

    #[test]
    fn test_still_loading_maps_to_recoverable_variant() {
        let err = GameError::from_asset("street", AssetError::StillLoading);
        assert!(matches!(err, GameError::AssetStillLoading { ref name } if name == "street"));
    }
}
