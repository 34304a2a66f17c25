//! # Saved Games
//!
//! One JSON record per player:
//!
//! ```text
//! {
//!   "high_score": 5120,
//!   "score": 812,
//!   "last_spawned_tile": [2, 3],
//!   "board": [[2, 0, 0, 0], [4, 8, 0, 0], [0, 0, 0, 0], [0, 0, 0, 2]]
//! }
//! ```
//!
//! Missing fields fall back to zero, `null` and an empty board, so older or
//! hand-edited files still load. Whether the board itself is usable is
//! decided by the session, not here.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use twenty48_core::{CoreResult, Grid, Position};

use crate::error::{GameError, GameResult};

/// The persisted part of a session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    /// Best score seen so far.
    pub high_score: u64,
    /// Score of the game in progress.
    pub score: u64,
    /// `[row, col]` of the most recent spawn.
    pub last_spawned_tile: Option<[usize; 2]>,
    /// Board rows, top to bottom.
    pub board: Vec<Vec<u32>>,
}

impl PersistedState {
    /// Captures a session's state.
    #[must_use]
    pub fn capture(grid: &Grid, score: u64, high_score: u64, last_spawned: Option<Position>) -> Self {
        Self {
            high_score,
            score,
            last_spawned_tile: last_spawned.map(|pos| [pos.row, pos.col]),
            board: grid.to_rows(),
        }
    }

    /// Validates and converts the stored board.
    ///
    /// # Errors
    ///
    /// Returns a core error if the board is not 4x4 or holds a value that is
    /// not a tile.
    pub fn grid(&self) -> CoreResult<Grid> {
        Grid::try_from_rows(self.board.as_slice())
    }

    /// The stored spawn position, if it is on the board.
    #[must_use]
    pub fn last_spawned(&self) -> Option<Position> {
        self.last_spawned_tile
            .and_then(|[row, col]| Position::try_new(row, col).ok())
    }
}

/// Somewhere a session can keep its state between runs.
pub trait StateStore {
    /// Loads the saved state.
    ///
    /// Returns `Ok(None)` when nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if saved state exists but cannot be read.
    fn load(&self) -> GameResult<Option<PersistedState>>;

    /// Replaces the saved state.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be written.
    fn save(&self, state: &PersistedState) -> GameResult<()>;
}

/// Saved game in a JSON file.
///
/// Writes go to a sibling temp file first and are renamed over the target,
/// so a crash mid-write leaves the previous save intact.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by `path`. Nothing is touched until the first
    /// load or save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this store reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> GameError {
        GameError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> GameResult<Option<PersistedState>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };

        let state = serde_json::from_str(&text).map_err(|source| GameError::MalformedState {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!("loaded saved game from {}", self.path.display());
        Ok(Some(state))
    }

    fn save(&self, state: &PersistedState) -> GameResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }

        let json = serde_json::to_string_pretty(state).map_err(GameError::Encode)?;
        let tmp = self.temp_path();
        std::fs::write(&tmp, json).map_err(|err| self.io_error(err))?;
        std::fs::rename(&tmp, &self.path).map_err(|err| self.io_error(err))?;

        tracing::debug!("saved game to {}", self.path.display());
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemorySlot {
    state: Option<PersistedState>,
    saves: usize,
    fail_saves: bool,
}

/// In-memory store for tests and headless runs.
///
/// Clones share the same slot, so a test can keep one handle and give the
/// other to a session.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<MemorySlot>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `state`.
    #[must_use]
    pub fn with_state(state: PersistedState) -> Self {
        let store = Self::new();
        store.slot.lock().state = Some(state);
        store
    }

    /// The currently stored state.
    #[must_use]
    pub fn snapshot(&self) -> Option<PersistedState> {
        self.slot.lock().state.clone()
    }

    /// Number of successful saves.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.slot.lock().saves
    }

    /// Makes every following save fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.slot.lock().fail_saves = failing;
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> GameResult<Option<PersistedState>> {
        Ok(self.slot.lock().state.clone())
    }

    fn save(&self, state: &PersistedState) -> GameResult<()> {
        let mut slot = self.slot.lock();
        if slot.fail_saves {
            return Err(GameError::Io {
                path: PathBuf::from("<memory>"),
                source: std::io::Error::other("store is read-only"),
            });
        }
        slot.state = Some(state.clone());
        slot.saves += 1;
        Ok(())
    }
}
