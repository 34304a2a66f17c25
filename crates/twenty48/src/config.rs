//! # Game Configuration
//!
//! Tunables loaded from an optional TOML file. Every field has a default, so
//! a partial file (or none at all) is valid:
//!
//! ```toml
//! win_tile = 2048
//! seed = 7
//!
//! [spawn]
//! two_weight = 6
//! four_weight = 1
//!
//! [animation]
//! fps = 60
//! spawn_ms = 200
//! merge_ms = 120
//! easing = "exponential_out"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use twenty48_core::{grid::is_valid_tile, SpawnWeights, WIN_TILE};
use twenty48_ui::{Easing, Pulse, PulseSpec};

use crate::error::{GameError, GameResult};

/// File name of the saved game inside the home directory.
pub const STATE_FILE_NAME: &str = "gamestate.json";

/// Top-level settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Tile value that wins the game.
    pub win_tile: u32,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Saved-game location; `None` means `$HOME/gamestate.json`.
    pub save_path: Option<PathBuf>,
    /// Capacity of the session to renderer event channel.
    pub event_capacity: usize,
    /// Spawn weights.
    pub spawn: SpawnConfig,
    /// Animation timings.
    pub animation: AnimationConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            win_tile: WIN_TILE,
            seed: None,
            save_path: None,
            event_capacity: 256,
            spawn: SpawnConfig::default(),
            animation: AnimationConfig::default(),
        }
    }
}

/// Relative weights of new tile values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Weight of a `2`.
    pub two_weight: u32,
    /// Weight of a `4`.
    pub four_weight: u32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            two_weight: SpawnWeights::CLASSIC.two(),
            four_weight: SpawnWeights::CLASSIC.four(),
        }
    }
}

/// Pulse timings and shapes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Scheduler tick rate.
    pub fps: u32,
    /// Length of the new-tile pulse in milliseconds.
    pub spawn_ms: u64,
    /// Length of the merge pulse in milliseconds.
    pub merge_ms: u64,
    /// Scale a new tile starts from.
    pub spawn_initial_scale: f32,
    /// Peak scale of a merged tile.
    pub merge_pulse_scale: f32,
    /// Curve applied to both pulses.
    pub easing: Easing,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            spawn_ms: 200,
            merge_ms: 120,
            spawn_initial_scale: 0.3,
            merge_pulse_scale: 1.3,
            easing: Easing::Linear,
        }
    }
}

impl AnimationConfig {
    /// Pulse played on a freshly spawned tile.
    #[must_use]
    pub fn spawn_pulse(&self) -> PulseSpec {
        PulseSpec {
            pulse: Pulse::Grow {
                from: self.spawn_initial_scale,
                easing: self.easing,
            },
            duration: Duration::from_millis(self.spawn_ms),
        }
    }

    /// Pulse played on a merged tile.
    #[must_use]
    pub fn merge_pulse(&self) -> PulseSpec {
        PulseSpec {
            pulse: Pulse::Bounce {
                amplitude: self.merge_pulse_scale - 1.0,
                easing: self.easing,
            },
            duration: Duration::from_millis(self.merge_ms),
        }
    }
}

impl GameConfig {
    /// Loads settings from a TOML file.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML for
    /// these settings, or holds out-of-range values.
    pub fn load(path: impl AsRef<Path>) -> GameResult<Self> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(GameError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::parse(&text, path)
    }

    /// Parses settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for these settings or
    /// holds out-of-range values.
    pub fn from_toml_str(text: &str) -> GameResult<Self> {
        Self::parse(text, Path::new("<inline>"))
    }

    fn parse(text: &str, origin: &Path) -> GameResult<Self> {
        let config: Self = toml::from_str(text).map_err(|source| GameError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidConfig`] naming the first bad value, or a
    /// core error for unusable spawn weights.
    pub fn validate(&self) -> GameResult<()> {
        if !is_valid_tile(self.win_tile) || self.win_tile < 4 {
            return Err(GameError::InvalidConfig(format!(
                "win_tile must be a power of two of at least 4, got {}",
                self.win_tile
            )));
        }
        if self.event_capacity == 0 {
            return Err(GameError::InvalidConfig("event_capacity must be positive".into()));
        }
        if self.animation.fps == 0 {
            return Err(GameError::InvalidConfig("animation.fps must be positive".into()));
        }
        let initial = self.animation.spawn_initial_scale;
        if !(0.0..=1.0).contains(&initial) {
            return Err(GameError::InvalidConfig(format!(
                "animation.spawn_initial_scale must be within [0, 1], got {initial}"
            )));
        }
        let peak = self.animation.merge_pulse_scale;
        if !peak.is_finite() || peak < 1.0 {
            return Err(GameError::InvalidConfig(format!(
                "animation.merge_pulse_scale must be at least 1, got {peak}"
            )));
        }
        self.spawn_weights()?;
        Ok(())
    }

    /// Spawn weights as the engine understands them.
    ///
    /// # Errors
    ///
    /// Returns a core error if both weights are zero.
    pub fn spawn_weights(&self) -> GameResult<SpawnWeights> {
        Ok(SpawnWeights::new(self.spawn.two_weight, self.spawn.four_weight)?)
    }

    /// Where the saved game lives.
    #[must_use]
    pub fn state_path(&self) -> PathBuf {
        self.save_path.clone().unwrap_or_else(default_state_path)
    }
}

/// `gamestate.json` in the user's home directory, or the working directory
/// if no home is set.
#[must_use]
pub fn default_state_path() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map_or_else(PathBuf::new, PathBuf::from)
        .join(STATE_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_classic_game() {
        let config = GameConfig::default();
        assert_eq!(config.win_tile, 2048);
        assert_eq!(config.spawn_weights().unwrap(), SpawnWeights::CLASSIC);
        assert_eq!(config.animation.spawn_pulse(), PulseSpec::SPAWN);

        let merge = config.animation.merge_pulse();
        assert_eq!(merge.duration, PulseSpec::MERGE.duration);
        assert!((merge.pulse.scale_at(0.5) - 1.3).abs() < 1e-5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = GameConfig::from_toml_str(
            r#"
            seed = 42

            [animation]
            merge_ms = 80
            easing = "exponential_out"
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, Some(42));
        assert_eq!(config.animation.merge_ms, 80);
        assert_eq!(config.animation.easing, Easing::ExponentialOut);
        assert_eq!(config.animation.spawn_ms, 200);
        assert_eq!(config.spawn, SpawnConfig::default());
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let bad_win = GameConfig::from_toml_str("win_tile = 1000");
        assert!(matches!(bad_win, Err(GameError::InvalidConfig(_))));

        let no_weights = GameConfig::from_toml_str("[spawn]\ntwo_weight = 0\nfour_weight = 0");
        assert!(matches!(no_weights, Err(GameError::Core(_))));

        let shrinking = GameConfig::from_toml_str("[animation]\nmerge_pulse_scale = 0.5");
        assert!(matches!(shrinking, Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let err = GameConfig::from_toml_str("win_tile = \"big\"").unwrap_err();
        assert!(matches!(err, GameError::ConfigParse { .. }));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("twenty48_config_that_does_not_exist.toml");
        let config = GameConfig::load(&path).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_explicit_save_path_wins() {
        let config = GameConfig {
            save_path: Some(PathBuf::from("/tmp/custom.json")),
            ..GameConfig::default()
        };
        assert_eq!(config.state_path(), PathBuf::from("/tmp/custom.json"));
        assert!(GameConfig::default().state_path().ends_with(STATE_FILE_NAME));
    }
}
