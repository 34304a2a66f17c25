//! # Game Error Types
//!
//! Errors from the outer layers: files, config and saved games. None of them
//! is fatal to a running session.

use std::path::PathBuf;

use thiserror::Error;
use twenty48_core::CoreError;

/// Errors that can occur around a game session.
#[derive(Error, Debug)]
pub enum GameError {
    /// Reading or writing a file failed.
    #[error("i/o error on {path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A saved game exists but is not valid JSON for the expected record.
    #[error("malformed saved game {path}: {source}")]
    MalformedState {
        /// The saved-game file.
        path: PathBuf,
        /// The parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Serializing a saved game failed.
    #[error("could not encode saved game: {0}")]
    Encode(#[source] serde_json::Error),

    /// A config file is not valid TOML for the expected settings.
    #[error("invalid config file {path}: {source}")]
    ConfigParse {
        /// The config file.
        path: PathBuf,
        /// The parse error.
        #[source]
        source: toml::de::Error,
    },

    /// A config value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Board or spawn data rejected by the engine.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Writing to the terminal failed.
    #[error("render error: {0}")]
    Render(#[from] std::fmt::Error),
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
